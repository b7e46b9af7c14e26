//! Request header validation integration tests (object PUT).
//!
//! Values a header cannot legally carry are refused before anything is sent;
//! the rest reach the service verbatim.

#[cfg(test)]
mod tests {
    use s3conform_core::fixtures::{content_md5, get_object, head_object};

    use crate::{
        cleanup_bucket, create_test_bucket, expect_bad_content_length, expect_client_side,
        expect_code, put_with, s3_client,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_short_md5() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_code(
            put_with(&client, &bucket, "key1", "bar", &[("Content-MD5", "YWJyYWNhZGFicmE=")])
                .await,
            "BadDigest",
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_mismatched_md5() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_code(
            put_with(
                &client,
                &bucket,
                "key1",
                "bar",
                &[("Content-MD5", "rL0Y20zC+Fzt72VPzMSk2A==")],
            )
            .await,
            "BadDigest",
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_blank_md5() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_code(
            put_with(&client, &bucket, "key1", "bar", &[("Content-MD5", " ")]).await,
            "InvalidDigest",
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_refuse_unreadable_md5() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_client_side(
            put_with(&client, &bucket, "key1", "bar", &[("Content-MD5", "\x07")]).await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_without_md5() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[])
            .await
            .expect("put without content-md5");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_with_correct_md5() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;
        let digest = content_md5(b"bar");

        put_with(&client, &bucket, "key1", "bar", &[("Content-MD5", &digest)])
            .await
            .expect("put with matching content-md5");
        assert_eq!(get_object(&client, &bucket, "key1").await.expect("get"), "bar");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_mismatched_expect() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_code(
            put_with(&client, &bucket, "key1", "bar", &[("Expect", "200")]).await,
            "ExpectationFailed",
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_with_empty_expect() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[("Expect", "")])
            .await
            .expect("put with empty expect");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_without_expect() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[])
            .await
            .expect("put without expect");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_refuse_unreadable_expect() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_client_side(put_with(&client, &bucket, "key1", "bar", &[("Expect", "\x07")]).await);

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_blank_content_length() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_bad_content_length(
            put_with(&client, &bucket, "key1", "bar", &[("Content-Length", " ")]).await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_negative_content_length() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_bad_content_length(
            put_with(&client, &bucket, "key1", "bar", &[("Content-Length", "-1")]).await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_without_content_length() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[("Content-Length", "")])
            .await
            .expect("put without content-length");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_refuse_unreadable_content_length() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_client_side(
            put_with(&client, &bucket, "key1", "bar", &[("Content-Length", "\x07")]).await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_with_valid_content_type() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[("Content-Type", "text/plain")])
            .await
            .expect("put with content-type");
        let head = head_object(&client, &bucket, "key1").await.expect("head");
        assert_eq!(head.content_type(), Some("text/plain"));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_with_blank_content_type() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[("Content-Type", " ")])
            .await
            .expect("put with blank content-type");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_without_content_type() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[("Content-Type", "")])
            .await
            .expect("put without content-type");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_refuse_unreadable_content_type() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_client_side(
            put_with(&client, &bucket, "key1", "bar", &[("Content-Type", "\x08")]).await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_refuse_unreadable_authorization() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        expect_client_side(
            put_with(&client, &bucket, "key1", "bar", &[("Authorization", "\x01")]).await,
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_sign_over_blank_authorization() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[("Authorization", " ")])
            .await
            .expect("signer replaces the override");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_sign_over_removed_authorization() {
        let client = s3_client();
        let bucket = create_test_bucket(&client).await;

        put_with(&client, &bucket, "key1", "bar", &[("Authorization", "")])
            .await
            .expect("signer adds the header back");

        cleanup_bucket(&client, &bucket).await;
    }
}
