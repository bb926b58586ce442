//! Application and service parameters, and the token maps derived from them.
//!
//! [`AppParams`] is also the persisted project record: it is written as JSON
//! to `<app root>/.rumi` when the application is created and read back
//! whenever a service is added.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{
    DomainError,
    naming::{
        for_display, package_to_dir, to_app_token_name, to_kebab_case, to_package_path,
        to_slash_case,
    },
    tokens::TokenMap,
    value_objects::{BuildTool, EncodingType, MessagingProvider, ServiceHaModel, ServiceType},
};

/// Name of the project record file at the application root.
pub const PROJECT_RECORD_FILE: &str = ".rumi";

/// Token receiving the first allocated factory id.
pub const STATE_MODEL_ID_TOKEN: &str = "ServiceStateModelId";

/// Token receiving the second allocated factory id.
pub const MESSAGE_MODEL_ID_TOKEN: &str = "ServiceMessageModelId";

/// Everything needed to generate an application skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppParams {
    pub app_name: String,
    /// Directory the application root is created in.
    pub app_dir: PathBuf,
    pub package_name: String,
    pub group_id: String,
    pub artifact_prefix: String,
    pub rumi_version: String,
    pub rumi_bindings_version: String,
    pub rumi_mgmt_version: String,
    #[serde(default)]
    pub encoding_type: EncodingType,
    #[serde(default)]
    pub messaging_provider: MessagingProvider,
    #[serde(default)]
    pub build_tool: BuildTool,
}

impl AppParams {
    /// Reject empty required fields.
    pub fn validate(&self) -> Result<(), DomainError> {
        let required: [(&'static str, &str); 7] = [
            ("app name", self.app_name.as_str()),
            ("package name", self.package_name.as_str()),
            ("group id", self.group_id.as_str()),
            ("artifact prefix", self.artifact_prefix.as_str()),
            ("runtime version", self.rumi_version.as_str()),
            ("bindings version", self.rumi_bindings_version.as_str()),
            ("management version", self.rumi_mgmt_version.as_str()),
        ];

        if let Some(&(field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DomainError::MissingRequiredField { field });
        }
        if self.app_dir.as_os_str().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "app dir" });
        }
        Ok(())
    }

    /// `Order Book` → `orderbook`.
    pub fn app_token_name(&self) -> String {
        to_app_token_name(&self.app_name)
    }

    /// `{prefix}-{app token}`, also the name of the application root directory.
    pub fn parent_artifact_id(&self) -> String {
        format!("{}-{}", self.artifact_prefix, self.app_token_name())
    }

    pub fn roe_artifact_id(&self) -> String {
        format!("{}-roe", self.parent_artifact_id())
    }

    pub fn system_artifact_id(&self) -> String {
        format!("{}-system", self.parent_artifact_id())
    }

    /// `app_dir/ParentArtifactId`.
    pub fn app_root(&self) -> PathBuf {
        self.app_dir.join(self.parent_artifact_id())
    }

    /// Template directory of the application skeleton, e.g. `maven/app`.
    pub fn template_path(&self) -> String {
        format!("{}/app", self.build_tool)
    }

    pub fn token_map(&self) -> TokenMap {
        let app_token = self.app_token_name();
        let parent = self.parent_artifact_id();

        TokenMap::builder()
            .token("AppDisplayName", for_display(&self.app_name))
            .token("AppDir", self.app_dir.display().to_string())
            .token("AppTokenName", app_token.as_str())
            .token("AppPackageName", self.package_name.as_str())
            .token("AppPackagePath", package_to_dir(&self.package_name))
            .token("GroupId", self.group_id.as_str())
            .token("ArtifactPrefix", self.artifact_prefix.as_str())
            .token("ParentArtifactId", parent.as_str())
            .token("RoeArtifactId", self.roe_artifact_id())
            .token("SystemArtifactId", self.system_artifact_id())
            .token("BusName", app_token.as_str())
            .token("RumiVersion", self.rumi_version.as_str())
            .token("RumiBindingsVersion", self.rumi_bindings_version.as_str())
            .token("RumiMgmtVersion", self.rumi_mgmt_version.as_str())
            .token("EncodingType", self.encoding_type.as_str())
            .token("MessagingProvider", self.messaging_provider.as_str())
            .token(
                "MessagingConnectionString",
                self.messaging_provider.connection_string(),
            )
            .token(
                "MessagingProviderDependency",
                self.messaging_provider.dependency_snippet(),
            )
            .token("BuildTool", self.build_tool.as_str())
            .build()
    }
}

/// Parameters of one service added to an existing application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParams {
    service_name: String,
    service_type: ServiceType,
    ha_model: Option<ServiceHaModel>,
    clustered: bool,
    partitions: u32,
}

impl ServiceParams {
    /// Validate and build.
    ///
    /// Clusterable types need an HA model; other types cannot be clustered.
    pub fn new(
        service_name: impl Into<String>,
        service_type: ServiceType,
        ha_model: Option<ServiceHaModel>,
        clustered: bool,
        partitions: u32,
    ) -> Result<Self, DomainError> {
        let service_name = service_name.into();
        if service_name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "service name",
            });
        }
        if partitions == 0 {
            return Err(DomainError::InvalidService {
                reason: "number of partitions must be at least 1".into(),
            });
        }
        if service_type.is_clusterable() && ha_model.is_none() {
            return Err(DomainError::InvalidService {
                reason: format!("an HA model must be specified for the '{service_type}' service type"),
            });
        }
        if !service_type.is_clusterable() && clustered {
            return Err(DomainError::InvalidService {
                reason: format!("the '{service_type}' service type is not clusterable"),
            });
        }

        Ok(Self {
            service_name,
            service_type,
            ha_model,
            clustered,
            partitions,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn ha_model(&self) -> Option<ServiceHaModel> {
        self.ha_model
    }

    pub fn clustered(&self) -> bool {
        self.clustered
    }

    pub fn partitions(&self) -> u32 {
        self.partitions
    }

    /// `OrderProcessor` → `order-processor`.
    pub fn token_name(&self) -> String {
        to_kebab_case(&self.service_name)
    }

    /// `ParentArtifactId-{token name}`.
    pub fn artifact_id(&self, app: &AppParams) -> String {
        format!("{}-{}", app.parent_artifact_id(), self.token_name())
    }

    /// `{tool}/service/{type}[/{ha}]`.
    pub fn template_path(&self, build_tool: BuildTool) -> String {
        self.with_ha_suffix(format!("{build_tool}/service/{}", self.service_type))
    }

    /// `{tool}/config/{type}[/{ha}]`.
    pub fn config_template_path(&self, build_tool: BuildTool) -> String {
        self.with_ha_suffix(format!("{build_tool}/config/{}", self.service_type))
    }

    fn with_ha_suffix(&self, base: String) -> String {
        match self.ha_model {
            Some(ha) => format!("{base}/{ha}"),
            None => base,
        }
    }

    /// The application's token map extended with the service tokens.
    ///
    /// Factory-id tokens are added later, once ids have been allocated.
    pub fn token_map(&self, app: &AppParams) -> TokenMap {
        let kebab = self.token_name();
        let ha_policy = self
            .ha_model
            .unwrap_or(ServiceHaModel::StateReplication)
            .policy_name();

        let service = TokenMap::builder()
            .token("ServiceDisplayName", for_display(&self.service_name))
            .token("ServiceTokenName", kebab.as_str())
            .token("ServiceName", format!("{}-{}", app.app_token_name(), kebab))
            .token("ServicePackageName", to_package_path(&kebab))
            .token("ServicePackagePath", to_slash_case(&kebab))
            .token("ServiceType", self.service_type.as_str())
            .token("ServiceHAModel", ha_policy)
            .token("ServiceArtifactId", self.artifact_id(app))
            .build();

        app.token_map().extended(&service)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{app, processor};
    use super::*;

    #[test]
    fn derived_artifact_ids() {
        let app = app();
        assert_eq!(app.app_token_name(), "orderbook");
        assert_eq!(app.parent_artifact_id(), "acme-orderbook");
        assert_eq!(app.system_artifact_id(), "acme-orderbook-system");
        assert_eq!(app.app_root(), PathBuf::from("/work/acme-orderbook"));
    }

    #[test]
    fn app_token_map() {
        let tokens = app().token_map();
        assert_eq!(tokens.get("AppDisplayName"), Some("Order Book"));
        assert_eq!(tokens.get("AppPackagePath"), Some("com/acme/orderbook"));
        assert_eq!(tokens.get("RoeArtifactId"), Some("acme-orderbook-roe"));
        assert_eq!(tokens.get("BusName"), Some("orderbook"));
        assert_eq!(tokens.get("MessagingProviderDependency"), Some(""));
        assert_eq!(tokens.get("BuildTool"), Some("maven"));
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let mut params = app();
        params.group_id = "  ".into();
        assert_eq!(
            params.validate(),
            Err(DomainError::MissingRequiredField { field: "group id" })
        );
    }

    #[test]
    fn service_tokens_extend_app_tokens() {
        let tokens = processor().token_map(&app());
        assert_eq!(tokens.get("ServiceTokenName"), Some("order-processor"));
        assert_eq!(tokens.get("ServiceName"), Some("orderbook-order-processor"));
        assert_eq!(tokens.get("ServicePackageName"), Some("order.processor"));
        assert_eq!(tokens.get("ServicePackagePath"), Some("order/processor"));
        assert_eq!(tokens.get("ServiceHAModel"), Some("EventSourcing"));
        assert_eq!(tokens.get("ServiceArtifactId"), Some("acme-orderbook-order-processor"));
        assert_eq!(tokens.get("GroupId"), Some("com.acme"));
    }

    #[test]
    fn template_paths_include_ha_model() {
        let svc = processor();
        assert_eq!(svc.template_path(BuildTool::Maven), "maven/service/processor/es");
        assert_eq!(svc.config_template_path(BuildTool::Maven), "maven/config/processor/es");

        let driver = ServiceParams::new("feed", ServiceType::Driver, None, false, 1).unwrap();
        assert_eq!(driver.template_path(BuildTool::Maven), "maven/service/driver");
    }

    #[test]
    fn processor_requires_ha_model() {
        let err = ServiceParams::new("p", ServiceType::Processor, None, false, 1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidService { .. }));
    }

    #[test]
    fn driver_cannot_be_clustered() {
        let err = ServiceParams::new("d", ServiceType::Driver, None, true, 1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidService { ref reason } if reason.contains("not clusterable")));
    }

    #[test]
    fn zero_partitions_rejected() {
        assert!(ServiceParams::new("d", ServiceType::Driver, None, false, 0).is_err());
    }

    #[test]
    fn blank_service_name_rejected() {
        assert_eq!(
            ServiceParams::new(" ", ServiceType::Driver, None, false, 1).unwrap_err(),
            DomainError::MissingRequiredField {
                field: "service name"
            }
        );
    }
}
