use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;

use super::{Result, ResultExt};

/// Label naming who manages a resource
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
/// Value of the managed-by label on every registry secret this tool owns
pub const ADMIN_REGISTRY_CMD_NAME: &str = "kn-admin-registry";
/// Label holding the service account a registry secret is attached to
pub const IMAGE_PULL_SERVICE_ACCOUNT: &str = "kn-admin-registry-serviceaccount";
/// Secret data key with the docker config json
pub const DOCKER_JSON_NAME: &str = ".dockerconfigjson";

/// Label selector matching the registry secrets managed here
pub fn label_selector() -> String {
    format!("{}={}", LABEL_MANAGED_BY, ADMIN_REGISTRY_CMD_NAME)
}

/// Credentials for a single registry server
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RegistryAuth {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// The `.dockerconfigjson` payload
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DockerConfig {
    #[serde(default)]
    pub auths: BTreeMap<String, RegistryAuth>,
}

/// Which registry secrets to list
///
/// A service account filter only makes sense inside a single namespace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegistryQuery {
    pub namespace: Option<String>,
    pub service_account: Option<String>,
}

impl RegistryQuery {
    pub fn new(namespace: Option<String>, service_account: Option<String>) -> Result<Self> {
        let namespace = namespace.filter(|n| !n.is_empty());
        let service_account = service_account.filter(|s| !s.is_empty());
        if namespace.is_none() && service_account.is_some() {
            bail!("cannot specify service account with empty namespace");
        }
        Ok(RegistryQuery { namespace, service_account })
    }

    /// Whether rows carry a namespace column
    pub fn all_namespaces(&self) -> bool {
        self.namespace.is_none()
    }

    /// Narrow the cluster namespaces down to the ones to search
    pub fn select_namespaces(&self, available: Vec<String>) -> Result<Vec<String>> {
        match &self.namespace {
            None => Ok(available),
            Some(ns) => {
                if available.iter().any(|a| a == ns) {
                    Ok(vec![ns.clone()])
                } else {
                    bail!("namespace {} not found", ns)
                }
            }
        }
    }

    /// Whether a secret passes the service account filter
    pub fn matches(&self, secret: &RegistrySecret) -> bool {
        match &self.service_account {
            None => true,
            Some(sa) => sa == &secret.service_account,
        }
    }
}

/// A registry secret reduced to what gets listed
#[derive(Clone, Debug, PartialEq)]
pub struct RegistrySecret {
    pub namespace: String,
    pub name: String,
    pub service_account: String,
    pub config: DockerConfig,
}

impl RegistrySecret {
    pub fn from_secret(secret: &Secret) -> Result<Self> {
        let md = secret.metadata.clone().unwrap_or_default();
        let namespace = md.namespace.unwrap_or_default();
        let name = md.name.unwrap_or_default();
        let service_account = md
            .labels
            .as_ref()
            .and_then(|l| l.get(IMAGE_PULL_SERVICE_ACCOUNT))
            .cloned()
            .unwrap_or_default();
        let raw = secret
            .data
            .as_ref()
            .and_then(|d| d.get(DOCKER_JSON_NAME))
            .map(|b| b.0.as_slice())
            .unwrap_or_default();
        let config: DockerConfig = serde_json::from_slice(raw)
            .chain_err(|| format!("failed to decode registry secret {}/{}", namespace, name))?;
        Ok(RegistrySecret { namespace, name, service_account, config })
    }
}

/// One line of `registry list`
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryRow {
    pub namespace: String,
    pub service_account: String,
    pub secret: String,
    pub username: String,
    pub server: String,
    pub email: String,
}

/// Build sorted rows from registry secrets
///
/// Secrets are ordered by namespace then name, each auth entry becomes its own row.
pub fn rows(secrets: &[Secret], query: &RegistryQuery) -> Result<Vec<RegistryRow>> {
    let mut decoded = vec![];
    for s in secrets {
        let reg = RegistrySecret::from_secret(s)?;
        if query.matches(&reg) {
            decoded.push(reg);
        }
    }
    decoded.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));

    let mut res = vec![];
    for reg in decoded {
        for (server, auth) in &reg.config.auths {
            res.push(RegistryRow {
                namespace: reg.namespace.clone(),
                service_account: reg.service_account.clone(),
                secret: reg.name.clone(),
                username: auth.username.clone(),
                server: server.clone(),
                email: auth.email.clone(),
            });
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::{rows, RegistryQuery, DOCKER_JSON_NAME, IMAGE_PULL_SERVICE_ACCOUNT};
    use k8s_openapi::api::core::v1::Secret;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use k8s_openapi::ByteString;

    fn secret(ns: &str, name: &str, sa: &str, json: &str) -> Secret {
        Secret {
            metadata: Some(ObjectMeta {
                name: Some(name.into()),
                namespace: Some(ns.into()),
                labels: Some(btreemap! {
                    IMAGE_PULL_SERVICE_ACCOUNT.to_string() => sa.to_string(),
                }),
                ..ObjectMeta::default()
            }),
            data: Some(btreemap! {
                DOCKER_JSON_NAME.to_string() => ByteString(json.as_bytes().to_vec()),
            }),
            ..Secret::default()
        }
    }

    fn auth(server: &str, user: &str) -> String {
        format!(
            r#"{{"auths":{{"{}":{{"username":"{}","password":"pw","email":"{}@example.com"}}}}}}"#,
            server, user, user
        )
    }

    #[test]
    fn query_rules() {
        let err = RegistryQuery::new(None, Some("sa".into())).unwrap_err();
        assert_eq!(err.to_string(), "cannot specify service account with empty namespace");
        assert!(RegistryQuery::new(Some("".into()), Some("sa".into())).is_err());

        let all = RegistryQuery::new(None, None).unwrap();
        assert!(all.all_namespaces());
        let nss = vec!["default".to_string(), "prod".to_string()];
        assert_eq!(all.select_namespaces(nss.clone()).unwrap(), nss);

        let one = RegistryQuery::new(Some("prod".into()), None).unwrap();
        assert!(!one.all_namespaces());
        assert_eq!(one.select_namespaces(nss.clone()).unwrap(), vec!["prod".to_string()]);
        let missing = RegistryQuery::new(Some("dev".into()), None).unwrap();
        assert_eq!(missing.select_namespaces(nss).unwrap_err().to_string(), "namespace dev not found");
    }

    #[test]
    fn rows_are_sorted_per_auth() {
        let two = r#"{"auths":{"quay.io":{"username":"b","email":"b@q"},"docker.io":{"username":"a","email":"a@d"}}}"#;
        let secrets = vec![
            secret("prod", "reg-b", "builder", &auth("gcr.io", "z")),
            secret("default", "reg-z", "default", two),
            secret("prod", "reg-a", "default", &auth("gcr.io", "y")),
        ];
        let q = RegistryQuery::new(None, None).unwrap();
        let res = rows(&secrets, &q).unwrap();
        let keys: Vec<_> = res
            .iter()
            .map(|r| format!("{}/{}/{}", r.namespace, r.secret, r.server))
            .collect();
        assert_eq!(keys, vec![
            "default/reg-z/docker.io",
            "default/reg-z/quay.io",
            "prod/reg-a/gcr.io",
            "prod/reg-b/gcr.io",
        ]);
        assert_eq!(res[0].username, "a");
        assert_eq!(res[0].email, "a@d");
        assert_eq!(res[3].service_account, "builder");
        assert_eq!(res[3].email, "z@example.com");
    }

    #[test]
    fn service_account_filter() {
        let secrets = vec![
            secret("prod", "reg-a", "default", &auth("gcr.io", "y")),
            secret("prod", "reg-b", "builder", &auth("gcr.io", "z")),
        ];
        let q = RegistryQuery::new(Some("prod".into()), Some("builder".into())).unwrap();
        let res = rows(&secrets, &q).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].secret, "reg-b");
    }

    #[test]
    fn undecodable_secret_fails() {
        let secrets = vec![secret("prod", "broken", "default", "not json")];
        let q = RegistryQuery::new(None, None).unwrap();
        let err = rows(&secrets, &q).unwrap_err();
        assert_eq!(err.to_string(), "failed to decode registry secret prod/broken");
    }
}
