//! Gemini-protocol client
//!
//! Implements the document validator, the procedure summarizer and a
//! best-effort translation call against a `generateContent` endpoint. The
//! request/response shapes, prompts and error-synthesis rules follow the
//! external contract: validation never propagates an error, it synthesizes
//! an invalid outcome with the configured connection/response text.

use crate::contract::{DocumentValidator, ProcedureSummarizer, ProcedureSummary, ValidationOutcome};
use crate::error::AiError;
use async_trait::async_trait;
use base64::Engine as _;
use padron_ledger::ExtractedField;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("padron/", env!("CARGO_PKG_VERSION"));

/// Validation prompt; `{document_type}` is substituted before sending
const VALIDATION_PROMPT: &str = "Usted es una IA de verificación de documentos para una oficina de padrón municipal española. Analice esta imagen. ¿Es un documento '{document_type}' válido y legible? Si es así, extraiga todas las entidades significativas relevantes para el empadronamiento municipal. Responda ÚNICAMENTE con un objeto JSON. El objeto JSON debe tener una clave 'isValid' (booleana), una clave 'reason' (cadena, explicando por qué no es válido si isValid es falso, o 'Documento válido' si es válido), y una clave 'extractedData'. El valor de 'extractedData' debe ser un array de objetos, donde cada objeto representa una entidad extraída y tiene la siguiente estructura: {'fieldName': 'string', 'description': 'string', 'value': 'string'}. 'fieldName' debe ser un identificador camelCase para el tipo de dato (ej: 'nombreCompleto', 'numeroIdentificacion', 'fechaNacimiento'), 'description' debe ser una etiqueta legible por humanos en español para el campo (ej: 'Nombre Completo', 'Número de Identificación'), y 'value' es el valor extraído. Si no se pueden extraer datos o el documento no es válido, 'extractedData' debe ser un array vacío. No incluya nada antes ni después del objeto JSON.";

/// Summary prompt; `{procedure_type}` and `{extracted_json}` are substituted
const SUMMARY_PROMPT: &str = r#"Eres un experto en trámites de empadronamiento municipal.
Tu tarea es analizar el tipo de trámite y la información extraída de los documentos proporcionados para determinar la dirección de empadronamiento final y la lista de personas a empadronar.

Tipo de Trámite (procedureType): "{procedure_type}"

Información Extraída de Documentos (extractedDataAllDocsJson):
{extracted_json}
El JSON anterior es un objeto donde cada clave representa un documento (ej: 'nombreDocumento_indice') y su valor es un array de objetos, cada uno con 'fieldName', 'description', y 'value' correspondientes a los datos extraídos de ese documento.

Basándote en esta información:
1.  Determina la dirección de empadronamiento más probable. Si hay múltiples direcciones o información conflictiva, elige la que parezca más relevante para el trámite o indica si no se puede determinar con certeza.
2.  Compila una lista final de personas a empadronar. Cada persona debe tener "name" (nombre completo) y "id_number" (número de identificación). Adicionalmente, si es posible inferirlo de los datos o el tipo de trámite, añade un campo "relationToApplicant" (relación con el solicitante principal, ej: "self", "child", "spouse"). Si hay personas mencionadas pero sin suficiente identificación (nombre Y número de ID), exclúyelas de esta lista final pero menciónalo en tu razonamiento.
3.  Proporciona una puntuación de confianza (confidenceScore) entre 0 y 1 sobre la exactitud de tu respuesta.
4.  Explica tu razonamiento (reasoning) concisamente, detallando cómo llegaste a tus conclusiones y mencionando cualquier ambigüedad o información faltante.

IMPORTANTE: Responde ÚNICAMENTE con un objeto JSON con la siguiente estructura exacta. No incluyas NADA antes ni después del objeto JSON.
{
  "registrationAddress": "string",
  "peopleToRegister": [
    { "name": "string", "id_number": "string", "relationToApplicant": "string" }
  ],
  "confidenceScore": "number",
  "reasoning": "string"
}"#;

const TRANSLATE_PROMPT: &str = r#"Translate the following text from {source_lang} to {target_lang}.
Return ONLY the translated text, with no additional explanations or surrounding characters.
Original text: "{text}""#;

/// Gemini client configuration
///
/// The error texts default to the Spanish catalog strings and are replaced
/// by the active locale's texts at session construction.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key; `None` short-circuits every call
    pub api_key: Option<String>,
    /// Base URL of the models endpoint
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
    /// Text used when the transport fails
    pub connection_error_text: String,
    /// Text used when the response shape is unexpected
    pub response_error_text: String,
    /// Text used when no API key is configured
    pub api_key_missing_text: String,
}

impl AiConfig {
    /// Configuration with an API key and default endpoint/texts
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// With error texts taken from a message catalog
    #[must_use]
    pub fn with_error_texts(
        mut self,
        connection: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.connection_error_text = connection.into();
        self.response_error_text = response.into();
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connection_error_text: "Error de conexión o procesamiento con la IA:".to_owned(),
            response_error_text:
                "No se pudo obtener una respuesta de la IA (estructura inesperada).".to_owned(),
            api_key_missing_text: "La clave de API no está configurada.".to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Inner text of the first candidate, the payload every call drills for
fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

/// Interpret the inner validation JSON, normalizing a missing or non-array
/// `extractedData` to empty
fn interpret_validation_json(inner: &str, response_error_text: &str) -> (bool, String, Vec<ExtractedField>) {
    let Ok(value) = serde_json::from_str::<Value>(inner) else {
        return (false, response_error_text.to_owned(), Vec::new());
    };
    let Some(is_valid) = value.get("isValid").and_then(Value::as_bool) else {
        return (false, response_error_text.to_owned(), Vec::new());
    };
    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or(response_error_text)
        .to_owned();
    let extracted = value
        .get("extractedData")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();
    (is_valid, reason, extracted)
}

/// Parse the inner summary JSON; missing required fields are a shape error
fn parse_summary_json(inner: &str) -> Result<ProcedureSummary, AiError> {
    let value: Value = serde_json::from_str(inner)?;
    let missing = ["peopleToRegister", "confidenceScore", "reasoning"]
        .into_iter()
        .find(|key| value.get(key).is_none());
    if let Some(field) = missing {
        return Err(AiError::ResponseShape(format!("missing field {field}")));
    }
    Ok(serde_json::from_value(value)?)
}

/// Response schema the validation call requests
fn validation_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isValid": {"type": "BOOLEAN"},
            "reason": {"type": "STRING"},
            "extractedData": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "fieldName": {"type": "STRING"},
                        "description": {"type": "STRING"},
                        "value": {"type": "STRING"}
                    },
                    "required": ["fieldName", "value"]
                }
            }
        },
        "required": ["isValid", "reason", "extractedData"]
    })
}

/// Response schema the summary call requests
fn summary_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "registrationAddress": {"type": "STRING"},
            "peopleToRegister": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {"type": "STRING"},
                        "id_number": {"type": "STRING"},
                        "relationToApplicant": {"type": "STRING"}
                    },
                    "required": ["name", "id_number"]
                }
            },
            "confidenceScore": {"type": "NUMBER"},
            "reasoning": {"type": "STRING"}
        },
        "required": ["peopleToRegister", "confidenceScore", "reasoning"]
    })
}

/// Client for the generateContent endpoint
pub struct GeminiClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl GeminiClient {
    /// Build a client; fails only if the HTTP client cannot be constructed
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Http(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn endpoint(&self, key: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.config.base_url, self.config.model, key
        )
    }

    async fn generate(&self, key: &str, request: &GenerateRequest) -> Result<String, AiError> {
        let response = self
            .http
            .post(self.endpoint(key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        first_candidate_text(parsed)
            .ok_or_else(|| AiError::ResponseShape("no candidate text".to_owned()))
    }
}

#[async_trait]
impl DocumentValidator for GeminiClient {
    async fn validate(&self, payload: &[u8], document_type: &str) -> ValidationOutcome {
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload);

        let Some(key) = self.config.api_key.clone() else {
            tracing::warn!("document validation skipped, no API key configured");
            return ValidationOutcome::failure(
                self.config.api_key_missing_text.clone(),
                Some(encoded),
            );
        };

        let prompt = VALIDATION_PROMPT.replace("{document_type}", document_type);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: prompt },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png".to_owned(),
                            data: encoded.clone(),
                        },
                    },
                ],
            }],
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": validation_response_schema(),
            })),
        };

        match self.generate(&key, &request).await {
            Ok(inner) => {
                let (is_valid, reason, extracted) =
                    interpret_validation_json(&inner, &self.config.response_error_text);
                ValidationOutcome {
                    is_valid,
                    reason,
                    extracted,
                    encoded_payload: Some(encoded),
                }
            }
            Err(AiError::ResponseShape(_)) => {
                tracing::error!(document_type, "unexpected validation response structure");
                ValidationOutcome::failure(self.config.response_error_text.clone(), Some(encoded))
            }
            Err(err) => {
                tracing::error!(document_type, error = %err, "validation call failed");
                ValidationOutcome::failure(
                    format!("{} {}", self.config.connection_error_text, err),
                    Some(encoded),
                )
            }
        }
    }
}

#[async_trait]
impl ProcedureSummarizer for GeminiClient {
    async fn summarize(
        &self,
        procedure_type: &str,
        extracted_json: &str,
    ) -> Result<ProcedureSummary, AiError> {
        let key = self.config.api_key.clone().ok_or(AiError::MissingApiKey)?;

        let prompt = SUMMARY_PROMPT
            .replace("{procedure_type}", procedure_type)
            .replace("{extracted_json}", extracted_json);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": summary_response_schema(),
            })),
        };

        let inner = self.generate(&key, &request).await?;
        parse_summary_json(&inner)
    }
}

impl GeminiClient {
    /// Best-effort translation; returns the input on any failure
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if text.trim().is_empty() || source_lang == target_lang {
            return text.to_owned();
        }
        let Some(key) = self.config.api_key.clone() else {
            return text.to_owned();
        };

        let prompt = TRANSLATE_PROMPT
            .replace("{source_lang}", source_lang)
            .replace("{target_lang}", target_lang)
            .replace("{text}", text);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: None,
        };

        match self.generate(&key, &request).await {
            Ok(translated) => translated.trim().to_owned(),
            Err(err) => {
                tracing::warn!(error = %err, "translation failed, returning original text");
                text.to_owned()
            }
        }
    }
}
