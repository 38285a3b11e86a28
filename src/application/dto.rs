//! Request and response types for the use cases

use std::path::PathBuf;

use crate::application::ValidationError;
use crate::generation::utils::is_valid_package_name;
use crate::generation::{ClientDefaults, GenerationRequest};

/// Generate a package from a Swagger document
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// File path or HTTP(S) URL
    pub spec_source: String,
    pub package: String,
    pub output_dir: PathBuf,
    pub service_name: Option<String>,
    pub client: ClientDefaults,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.spec_source.trim().is_empty() {
            return Err(ValidationError::MissingField("spec".to_string()));
        }
        if self.package.is_empty() {
            return Err(ValidationError::EmptyPackageName);
        }
        if !is_valid_package_name(&self.package) {
            return Err(ValidationError::InvalidPackageName(self.package.clone()));
        }
        if self.service_name.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ValidationError::InvalidConfiguration(
                "service_name cannot be blank".to_string(),
            ));
        }
        validate_client_defaults(&self.client)
    }

    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            spec_source: self.spec_source.clone(),
            package: self.package.clone(),
            service_name: self.service_name.clone(),
            client: self.client.clone(),
        }
    }
}

fn validate_client_defaults(client: &ClientDefaults) -> Result<(), ValidationError> {
    let invalid = |message: &str| Err(ValidationError::InvalidConfiguration(message.to_string()));
    if client.error_percent_threshold > 100 {
        return invalid("error_percent_threshold must be between 0 and 100");
    }
    if client.max_concurrent_requests == 0 {
        return invalid("max_concurrent_requests must be at least 1");
    }
    if client.timeout_ms == 0 {
        return invalid("timeout_ms must be at least 1");
    }
    Ok(())
}

/// Outcome of a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponse {
    pub artifacts_count: usize,
    /// Files whose content changed
    pub written: usize,
    pub operations: usize,
    pub output_path: PathBuf,
    pub fingerprint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            spec_source: "petstore.yaml".to_string(),
            package: "petstore".to_string(),
            output_dir: PathBuf::from("out"),
            service_name: None,
            client: ClientDefaults::default(),
        }
    }

    #[test]
    fn test_generate_request_validation() {
        assert!(request().validate().is_ok());

        let mut empty = request();
        empty.package = String::new();
        assert_eq!(empty.validate(), Err(ValidationError::EmptyPackageName));

        let mut invalid = request();
        invalid.package = "pet store".to_string();
        assert_eq!(
            invalid.validate(),
            Err(ValidationError::InvalidPackageName("pet store".to_string()))
        );

        let mut no_spec = request();
        no_spec.spec_source = " ".to_string();
        assert!(matches!(no_spec.validate(), Err(ValidationError::MissingField(_))));
    }

    #[test]
    fn test_client_defaults_validation() {
        let mut bad = request();
        bad.client.error_percent_threshold = 150;
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::InvalidConfiguration(_))
        ));

        let mut zero = request();
        zero.client.max_concurrent_requests = 0;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_generation_request_carries_fields() {
        let mut req = request();
        req.service_name = Some("pets".to_string());
        req.client.retries = 3;
        let generation = req.generation_request();
        assert_eq!(generation.package, "petstore");
        assert_eq!(generation.service_name.as_deref(), Some("pets"));
        assert_eq!(generation.client.retries, 3);
    }
}
