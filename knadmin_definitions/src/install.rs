use k8s_openapi::api::core::v1::ConfigMap;

use super::{ErrorKind, Result};

const OPERATOR_API_PREFIX: &str = "operator.knative.dev";
const OPERATOR_KIND: &str = "KnativeServing";

/// How knative serving ended up in the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallationMethod {
    Unknown,
    /// Plain yaml release files
    Standalone,
    /// Reconciled by the knative operator
    Operator,
}

impl Default for InstallationMethod {
    fn default() -> Self {
        InstallationMethod::Unknown
    }
}

impl InstallationMethod {
    /// Infer the method from the owners of the `config-domain` config map
    pub fn detect(cm: &ConfigMap) -> Self {
        let owners = cm
            .metadata
            .as_ref()
            .and_then(|md| md.owner_references.as_ref());
        if let Some(refs) = owners {
            for o in refs {
                if o.api_version.starts_with(OPERATOR_API_PREFIX) && o.kind == OPERATOR_KIND {
                    debug!("config-domain owned by {}/{}", o.api_version, o.kind);
                    return InstallationMethod::Operator;
                }
            }
        }
        InstallationMethod::Standalone
    }

    /// Only standalone installs can have their config maps edited directly
    pub fn ensure_standalone(self) -> Result<()> {
        match self {
            InstallationMethod::Standalone => Ok(()),
            InstallationMethod::Operator => bail!(ErrorKind::OperatorModeNotSupported),
            InstallationMethod::Unknown => bail!(ErrorKind::InstallationMethodUnknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InstallationMethod;
    use k8s_openapi::api::core::v1::ConfigMap;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};

    fn owned_by(api_version: &str, kind: &str) -> ConfigMap {
        ConfigMap {
            metadata: Some(ObjectMeta {
                name: Some("config-domain".into()),
                owner_references: Some(vec![OwnerReference {
                    api_version: api_version.into(),
                    kind: kind.into(),
                    name: "knative-serving".into(),
                    uid: "1234".into(),
                    ..OwnerReference::default()
                }]),
                ..ObjectMeta::default()
            }),
            ..ConfigMap::default()
        }
    }

    #[test]
    fn detection() {
        let op = owned_by("operator.knative.dev/v1alpha1", "KnativeServing");
        assert_eq!(InstallationMethod::detect(&op), InstallationMethod::Operator);
        let other = owned_by("operator.knative.dev/v1alpha1", "KnativeEventing");
        assert_eq!(InstallationMethod::detect(&other), InstallationMethod::Standalone);
        let foreign = owned_by("apps/v1", "KnativeServing");
        assert_eq!(InstallationMethod::detect(&foreign), InstallationMethod::Standalone);
        assert_eq!(InstallationMethod::detect(&ConfigMap::default()), InstallationMethod::Standalone);
    }

    #[test]
    fn only_standalone_is_editable() {
        assert!(InstallationMethod::Standalone.ensure_standalone().is_ok());
        let err = InstallationMethod::Operator.ensure_standalone().unwrap_err();
        assert_eq!(err.to_string(), "Knative managed by operator is not supported yet");
        let err = InstallationMethod::Unknown.ensure_standalone().unwrap_err();
        assert_eq!(err.to_string(), "Cannot detect current installation method");
        assert_eq!(InstallationMethod::default(), InstallationMethod::Unknown);
    }
}
