use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub backend_url: String,
    pub backend_api_key: String,
    pub position_ttl_minutes: i64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            backend_url: "http://localhost:9100".to_string(),
            backend_api_key: "test-api-key".to_string(),
            position_ttl_minutes: 30,
        }
    }
}

impl TestConfig {
    pub fn with_backend_url(backend_url: &str) -> Self {
        Self {
            backend_url: backend_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            backend_url: self.backend_url.clone(),
            backend_api_key: self.backend_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            position_ttl_minutes: self.position_ttl_minutes,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned upstream JSON in the backend's Italian wire shape.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn slot_response(date: &str, start_time: &str, doctor_id: &str) -> serde_json::Value {
        json!({
            "data": date,
            "oraInizio": start_time,
            "medicoId": doctor_id,
            "nomeMedico": "Dr. Rossi",
            "sedeId": "sede-1",
            "nomeSede": "Clinica Centro"
        })
    }

    pub fn upcoming_slots_response(doctor_id: &str) -> serde_json::Value {
        json!([
            Self::slot_response("2026-09-02", "10:30", doctor_id),
            Self::slot_response("2026-09-01", "09:00", doctor_id),
            Self::slot_response("2026-09-01", "15:00", doctor_id),
        ])
    }

    pub fn locations_response() -> serde_json::Value {
        json!([
            {
                "id": "sede-1",
                "nome": "Clinica Centro",
                "indirizzo": "Via Roma 1",
                "citta": "Piacenza",
                "latitudine": "45.05",
                "longitudine": "9.70"
            },
            {
                "id": "sede-2",
                "nome": "Clinica Nord",
                "indirizzo": "Via Milano 10",
                "citta": "Milano",
                "latitudine": "45,46",
                "longitudine": "9,19"
            },
            {
                "id": "sede-3",
                "nome": "Sede senza coordinate",
                "indirizzo": null,
                "citta": null,
                "latitudine": null,
                "longitudine": null
            }
        ])
    }

    pub fn created_appointment_response(patient_id: &str, doctor_id: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "pazienteId": patient_id,
            "medicoId": doctor_id,
            "data": "2026-09-01",
            "oraInizio": "09:00",
            "tipoAppuntamento": "visita",
            "stato": "confermato"
        })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({
            "error": message
        })
    }
}
