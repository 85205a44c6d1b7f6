pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::assist::handlers as assist;
use crate::customization::handlers as customization;
use crate::previews::handlers as previews;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template catalogue
        .route("/api/v1/templates", get(customization::handle_list_templates))
        .route(
            "/api/v1/templates/:template_id/defaults",
            get(customization::handle_template_defaults),
        )
        .route(
            "/api/v1/spacing-presets",
            get(customization::handle_spacing_presets),
        )
        // Editor sessions
        .route(
            "/api/v1/customizations",
            post(customization::handle_open_session),
        )
        .route(
            "/api/v1/customizations/:session_id",
            get(customization::handle_get_session)
                .patch(customization::handle_bulk_update)
                .delete(customization::handle_close_session),
        )
        .route(
            "/api/v1/customizations/:session_id/identifiers",
            put(customization::handle_switch_identifiers),
        )
        .route(
            "/api/v1/customizations/:session_id/field",
            patch(customization::handle_update_field),
        )
        .route(
            "/api/v1/customizations/:session_id/reset",
            post(customization::handle_reset),
        )
        .route(
            "/api/v1/customizations/:session_id/undo",
            post(customization::handle_undo),
        )
        .route(
            "/api/v1/customizations/:session_id/redo",
            post(customization::handle_redo),
        )
        .route(
            "/api/v1/customizations/:session_id/save",
            post(customization::handle_save),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/share",
            post(resumes::handle_enable_sharing).delete(resumes::handle_disable_sharing),
        )
        .route(
            "/api/v1/public/:slug",
            get(resumes::handle_get_public_resume),
        )
        // Preview history
        .route(
            "/api/v1/resumes/:id/previews",
            get(previews::handle_list_previews).post(previews::handle_record_preview),
        )
        .route(
            "/api/v1/resumes/:id/previews/:template_id",
            get(previews::handle_check_preview),
        )
        // AI assist
        .route("/api/v1/assist/generate", post(assist::handle_generate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::customization::store::InMemoryConfigStore;
    use crate::customization::{ConfigStore, PersistenceError, TemplateConfig};
    use crate::state::test_state;

    struct FailingStore;

    #[async_trait]
    impl ConfigStore for FailingStore {
        async fn fetch_config(&self, _resume_id: Uuid) -> Result<Option<Value>, PersistenceError> {
            Err(PersistenceError::Unavailable("timeout".to_string()))
        }

        async fn store_config(
            &self,
            _resume_id: Uuid,
            _config: &TemplateConfig,
        ) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("timeout".to_string()))
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn open(app: &Router, template_id: &str, resume_id: Uuid) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/customizations",
            Some(json!({ "template_id": template_id, "resume_id": resume_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_template_catalogue() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));

        let (status, body) = send(&app, Method::GET, "/api/v1/templates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 6);

        let (status, body) =
            send(&app, Method::GET, "/api/v1/templates/modern-1/defaults", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fontFamily"], "inter");

        let (status, _) = send(&app, Method::GET, "/api/v1/templates/nope/defaults", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::GET, "/api/v1/spacing-presets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "compact");
    }

    #[tokio::test]
    async fn test_open_session_loads_defaults() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/customizations",
            Some(json!({ "template_id": "modern-1", "resume_id": Uuid::new_v4() })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let state = &body["state"];
        assert_eq!(state["config"]["fontFamily"], "inter");
        assert_eq!(state["config"]["showBorders"], true);
        assert_eq!(state["history_len"], 1);
        assert_eq!(state["can_undo"], false);
    }

    #[tokio::test]
    async fn test_open_session_unknown_template() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/customizations",
            Some(json!({ "template_id": "retro-7" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_field_then_undo() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let id = open(&app, "modern-1", Uuid::new_v4()).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customizations/{id}/field"),
            Some(json!({ "key": "showBorders", "value": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["config"]["showBorders"], false);
        assert_eq!(body["state"]["can_undo"], true);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/customizations/{id}/undo"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["config"]["showBorders"], true);
        assert_eq!(body["state"]["config"]["fontFamily"], "inter");
        assert_eq!(body["state"]["can_redo"], true);

        let (_, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/customizations/{id}/redo"),
            None,
        )
        .await;
        assert_eq!(body["state"]["config"]["showBorders"], false);
    }

    #[tokio::test]
    async fn test_bulk_update_single_history_entry() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let id = open(&app, "modern-1", Uuid::new_v4()).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customizations/{id}"),
            Some(json!({ "fields": {
                "fontFamily": "lato",
                "colorScheme": "green",
                "spacingPreset": "compact"
            }})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["history_len"], 2);
        assert_eq!(body["state"]["config"]["lineHeight"], 1.2);
    }

    #[tokio::test]
    async fn test_invalid_field_rejected() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let id = open(&app, "modern-1", Uuid::new_v4()).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customizations/{id}/field"),
            Some(json!({ "key": "fontWeight", "value": "bold" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/customizations/{id}"), None).await;
        assert_eq!(body["state"]["history_len"], 1);
    }

    #[tokio::test]
    async fn test_out_of_range_font_size_rejected() {
        let store = Arc::new(InMemoryConfigStore::new());
        let app = build_router(test_state(store.clone()));
        let resume_id = Uuid::new_v4();
        let id = open(&app, "modern-1", resume_id).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customizations/{id}/field"),
            Some(json!({ "key": "fontSize", "value": 1e39 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        send(&app, Method::POST, &format!("/api/v1/customizations/{id}/save"), None).await;
        let (_, body) = send(&app, Method::GET, &format!("/api/v1/customizations/{id}"), None).await;
        assert_eq!(body["state"]["history_len"], 1);
        assert_eq!(body["state"]["config"]["fontSize"], 11.0);
        assert_eq!(store.saved(resume_id).await.unwrap()["fontSize"], 11.0);
    }

    #[tokio::test]
    async fn test_bulk_update_rejects_ambiguous_fields() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let id = open(&app, "modern-1", Uuid::new_v4()).await;
        let uri = format!("/api/v1/customizations/{id}");

        for fields in [
            json!({ "showBorders": false, "show_borders": true }),
            json!({ "SHOWBORDERS": false }),
            json!({ "fontsize": 12 }),
        ] {
            let body = json!({ "fields": fields.clone() });
            let (status, _) = send(&app, Method::PATCH, &uri, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{fields}");
        }

        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["state"]["history_len"], 1);
        assert_eq!(body["state"]["loading"], false);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let uri = format!("/api/v1/customizations/{}/undo", Uuid::new_v4());
        let (status, _) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_persists_current_snapshot() {
        let store = Arc::new(InMemoryConfigStore::new());
        let app = build_router(test_state(store.clone()));
        let resume_id = Uuid::new_v4();
        let id = open(&app, "classic-1", resume_id).await;

        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customizations/{id}/field"),
            Some(json!({ "key": "color_scheme", "value": "teal" })),
        )
        .await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/customizations/{id}/save"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let saved = store.saved(resume_id).await.unwrap();
        assert_eq!(saved["colorScheme"], "teal");
        assert_eq!(saved["fontFamily"], "georgia");
    }

    #[tokio::test]
    async fn test_failed_save_reports_and_keeps_state() {
        let app = build_router(test_state(Arc::new(FailingStore)));
        let id = open(&app, "modern-1", Uuid::new_v4()).await;

        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customizations/{id}/field"),
            Some(json!({ "key": "fontFamily", "value": "lato" })),
        )
        .await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/customizations/{id}/save"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/customizations/{id}"), None).await;
        assert_eq!(body["state"]["config"]["fontFamily"], "lato");
        assert_eq!(body["state"]["history_len"], 2);
    }

    #[tokio::test]
    async fn test_switch_identifiers_resets_history() {
        let store = Arc::new(InMemoryConfigStore::new());
        let other_resume = Uuid::new_v4();
        store
            .seed(other_resume, json!({ "colorScheme": "red" }))
            .await;
        let app = build_router(test_state(store));
        let id = open(&app, "modern-1", Uuid::new_v4()).await;

        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customizations/{id}/field"),
            Some(json!({ "key": "fontFamily", "value": "lato" })),
        )
        .await;
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/customizations/{id}/identifiers"),
            Some(json!({ "template_id": "executive-1", "resume_id": other_resume })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let state = &body["state"];
        assert_eq!(state["template_id"], "executive-1");
        assert_eq!(state["history_len"], 1);
        assert_eq!(state["config"]["colorScheme"], "red");
        assert_eq!(state["config"]["fontFamily"], "merriweather");
    }

    #[tokio::test]
    async fn test_close_session() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let id = open(&app, "minimal-1", Uuid::new_v4()).await;
        let uri = format!("/api/v1/customizations/{id}");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_assist_rejects_empty_content() {
        let app = build_router(test_state(Arc::new(InMemoryConfigStore::new())));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assist/generate",
            Some(json!({ "kind": "summary", "content": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
