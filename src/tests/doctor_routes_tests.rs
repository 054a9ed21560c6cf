/// Router-level behaviour that is not specific to one doctor endpoint

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::doctors::parse_doctor_id;
    use crate::test_utils::{empty_request, json_request, MultipartForm, TestConfigBuilder, TestContext, JPEG_BYTES, PNG_BYTES};

    #[tokio::test]
    async fn test_root_banner() {
        let ctx = TestContext::new();
        let (status, body) = ctx.send(empty_request("GET", "/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Medway API is running..."));
    }

    #[tokio::test]
    async fn test_health_reports_backends() {
        let ctx = TestContext::new();
        let (status, body) = ctx.send(empty_request("GET", "/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "memory");
        assert_eq!(body["image_store"], "mock");
    }

    #[tokio::test]
    async fn test_list_aliases_return_same_records() {
        let ctx = TestContext::new();
        ctx.create_doctor(crate::test_utils::sample_doctor_payload()).await;

        let (_, root_list) = ctx.send(empty_request("GET", "/api/doctors")).await;
        let (_, all_list) = ctx.send(empty_request("GET", "/api/doctors/all")).await;

        assert_eq!(root_list.as_array().unwrap().len(), 1);
        assert_eq!(root_list, all_list);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let ctx = TestContext::new();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/doctors/add")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"name\": "))
            .unwrap();

        let (status, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DOCTOR_INVALID_BODY");
        assert!(ctx.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_with_blank_name_is_rejected() {
        let ctx = TestContext::new();
        let id = ctx.create_doctor(crate::test_utils::sample_doctor_payload()).await;

        let (status, body) = ctx
            .send(json_request("PUT", &format!("/api/doctors/{}", id), &json!({"name": "  "})))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DOCTOR_INVALID_BODY");

        let (_, list) = ctx.send(empty_request("GET", "/api/doctors")).await;
        assert_eq!(list[0]["name"], "Dr. Asha Menon");
    }

    #[tokio::test]
    async fn test_update_with_malformed_id_is_not_found() {
        let ctx = TestContext::new();
        let (status, body) = ctx
            .send(json_request("PUT", "/api/doctors/not-a-uuid", &json!({"rating": 3})))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Doctor not found");
    }

    #[tokio::test]
    async fn test_malformed_id_wins_over_invalid_update_body() {
        let ctx = TestContext::new();

        let (status, body) = ctx
            .send(json_request("PUT", "/api/doctors/not-a-uuid", &json!({"name": " "})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "DOCTOR_NOT_FOUND");

        // Well-formed ids are only looked up once the body is valid
        let (status, _) = ctx
            .send(json_request("PUT", &format!("/api/doctors/{}", uuid::Uuid::new_v4()), &json!({"name": " "})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_configured_image_types_restrict_uploads() {
        let ctx = TestContext::with_config(TestConfigBuilder::default().with_allowed_image_types(&["jpg", "jpeg"]));

        let png = MultipartForm::new()
            .with_doctor_fields()
            .file("image", "kiran.png", "image/png", PNG_BYTES)
            .into_request("/api/doctors");
        let (status, body) = ctx.send(png).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DOCTOR_IMAGE_UNSUPPORTED_TYPE");
        assert!(body["error"].as_str().unwrap().contains("jpg, jpeg"));
        assert_eq!(ctx.images.upload_count(), 0);

        let jpeg = MultipartForm::new()
            .with_doctor_fields()
            .file("image", "kiran.jpg", "image/jpeg", JPEG_BYTES)
            .into_request("/api/doctors");
        let (status, _) = ctx.send(jpeg).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ctx.images.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_image_rejected_before_upload() {
        let ctx = TestContext::with_config(TestConfigBuilder::default().with_max_image_size_mb(1));

        let mut image = PNG_BYTES.to_vec();
        image.resize(1024 * 1024 + 512, 0);
        let request = MultipartForm::new()
            .with_doctor_fields()
            .file("image", "big.png", "image/png", &image)
            .into_request("/api/doctors");

        let (status, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["code"], "DOCTOR_IMAGE_TOO_LARGE");
        assert_eq!(ctx.images.upload_count(), 0);
        assert!(ctx.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_non_image_upload_rejected() {
        let ctx = TestContext::new();
        let request = MultipartForm::new()
            .with_doctor_fields()
            .file("image", "notes.png", "image/png", b"%PDF-1.7 definitely not a picture")
            .into_request("/api/doctors");

        let (status, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DOCTOR_IMAGE_UNSUPPORTED_TYPE");
        assert_eq!(ctx.images.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_uploads_go_to_configured_folder() {
        let ctx = TestContext::with_config(TestConfigBuilder::default().with_upload_folder("clinic/portraits"));
        let request = MultipartForm::new()
            .with_doctor_fields()
            .file("image", "kiran.png", "image/png", PNG_BYTES)
            .into_request("/api/doctors");

        let (status, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::OK);
        let uploads = ctx.images.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "clinic/portraits");
        assert_eq!(uploads[0].1.content_type, "image/png");
        assert_eq!(body["doctor"]["image"], "https://images.test/clinic/portraits/portrait-1.png");
    }

    #[test]
    fn test_parse_doctor_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_doctor_id(&id.to_string()), Some(id));
        assert_eq!(parse_doctor_id("665f1c2e9b1e8a3d4c5b6a7f"), None);
    }
}
