//! Server-side encryption integration tests.
//!
//! SSE-C cases run only when `S3_ENABLE_SSE_C` is set, SSE-KMS cases only
//! when `S3_SSE_KMS_KEY_ID` names a key.

#[cfg(test)]
mod tests {
    use s3conform_core::Error;
    use s3conform_core::fixtures::{
        SSE_C_ALGORITHM, SseCustomerKey, get_object, get_object_bytes, get_object_sse_c,
        put_object_sse_c, put_object_sse_kms,
    };

    use crate::{cleanup_bucket, config, create_test_bucket, put_with, s3_client};

    const SSE_C_KEY: &str = "pO3upElrwuEXSoFwCfnZPdSsmt/xWeFa0N9KgDijwVs=";
    const SSE_C_KEY_MD5: &str = "DWygnHRtgiJ77HCm+1rvHw==";

    /// Returns the client when SSE-C cases are enabled.
    fn sse_c_client() -> Option<aws_sdk_s3::Client> {
        let client = s3_client();
        if config().sse_c {
            Some(client)
        } else {
            tracing::warn!("SSE-C disabled, skipping");
            None
        }
    }

    /// Returns the client and KMS key id when SSE-KMS cases are enabled.
    fn sse_kms_client() -> Option<(aws_sdk_s3::Client, String)> {
        let client = s3_client();
        if let Some(kms_key_id) = config().sse_kms_key_id {
            Some((client, kms_key_id))
        } else {
            tracing::warn!("no KMS key configured, skipping SSE-KMS");
            None
        }
    }

    /// PUT ten bytes with raw SSE-C headers.
    async fn put_with_sse_c_headers(
        client: &aws_sdk_s3::Client,
        bucket: &str,
        algorithm: &str,
        key: &str,
        key_md5: &str,
    ) -> Result<(), Error> {
        put_with(
            client,
            bucket,
            "testobj",
            "AAAAAAAAAA",
            &[
                ("x-amz-server-side-encryption-customer-algorithm", algorithm),
                ("x-amz-server-side-encryption-customer-key", key),
                ("x-amz-server-side-encryption-customer-key-MD5", key_md5),
            ],
        )
        .await
    }

    #[track_caller]
    fn expect_rejected_sse_c(result: Result<(), Error>) {
        let err = result.expect_err("inconsistent SSE-C headers");
        assert_eq!(err.status(), Some(400), "unexpected error: {err}");
    }

    async fn round_trip_sse_c(size: usize) {
        let Some(client) = sse_c_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;
        let key = SseCustomerKey::generate();
        let data = vec![b'A'; size];

        put_object_sse_c(&client, &bucket, "testobj", data.clone(), &key)
            .await
            .expect("sse-c put");
        let got = get_object_sse_c(&client, &bucket, "testobj", &key)
            .await
            .expect("sse-c get");
        assert_eq!(got.len(), size);
        assert_eq!(got.as_ref(), data.as_slice());

        cleanup_bucket(&client, &bucket).await;
    }

    async fn round_trip_sse_kms(size: usize) {
        let Some((client, kms_key_id)) = sse_kms_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;
        let data = "A".repeat(size);

        put_object_sse_kms(&client, &bucket, "testobj", &data, &kms_key_id)
            .await
            .expect("sse-kms put");
        let got = get_object(&client, &bucket, "testobj").await.expect("get");
        assert_eq!(got.len(), size);
        assert_eq!(got, data);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_one_byte_sse_c() {
        round_trip_sse_c(1).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_thirteen_byte_sse_c() {
        round_trip_sse_c(13).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_one_kib_sse_c() {
        round_trip_sse_c(1024).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_one_mib_sse_c() {
        round_trip_sse_c(1024 * 1024).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_sse_c_read_without_key() {
        let Some(client) = sse_c_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;
        let key = SseCustomerKey::generate();

        put_object_sse_c(&client, &bucket, "testobj", vec![b'A'; 13], &key)
            .await
            .expect("sse-c put");
        let err = get_object_bytes(&client, &bucket, "testobj")
            .await
            .expect_err("read without key");
        assert!(
            matches!(err.status(), Some(400 | 403)),
            "unexpected error: {err}"
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_sse_c_read_with_other_key() {
        let Some(client) = sse_c_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;
        let key = SseCustomerKey::generate();

        put_object_sse_c(&client, &bucket, "testobj", vec![b'A'; 13], &key)
            .await
            .expect("sse-c put");
        let err = get_object_sse_c(&client, &bucket, "testobj", &SseCustomerKey::generate())
            .await
            .expect_err("read with other key");
        assert!(
            matches!(err.status(), Some(400 | 403)),
            "unexpected error: {err}"
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_sse_c_with_wrong_key_md5() {
        let Some(client) = sse_c_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;

        expect_rejected_sse_c(
            put_with_sse_c_headers(
                &client,
                &bucket,
                SSE_C_ALGORITHM,
                SSE_C_KEY,
                "AAAAAAAAAAAAAAAAAAAAAA==",
            )
            .await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_sse_c_with_blank_key_md5() {
        let Some(client) = sse_c_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;

        expect_rejected_sse_c(
            put_with_sse_c_headers(&client, &bucket, SSE_C_ALGORITHM, SSE_C_KEY, " ").await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_sse_c_with_blank_key() {
        let Some(client) = sse_c_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;

        expect_rejected_sse_c(
            put_with_sse_c_headers(&client, &bucket, SSE_C_ALGORITHM, " ", " ").await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_handle_sse_c_key_without_algorithm() {
        let Some(client) = sse_c_client() else {
            return;
        };
        let bucket = create_test_bucket(&client).await;

        // Either the service refuses the key, or it stores the object in the clear.
        match put_with_sse_c_headers(&client, &bucket, " ", SSE_C_KEY, SSE_C_KEY_MD5).await {
            Ok(()) => assert_eq!(
                get_object(&client, &bucket, "testobj").await.expect("get"),
                "AAAAAAAAAA"
            ),
            Err(err) => assert_eq!(err.status(), Some(400), "unexpected error: {err}"),
        }

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_one_byte_sse_kms() {
        round_trip_sse_kms(1).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_sse_kms() {
        round_trip_sse_kms(13).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_one_kib_sse_kms() {
        round_trip_sse_kms(1024).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_one_mib_sse_kms() {
        round_trip_sse_kms(1024 * 1024).await;
    }
}
