use crate::{AdminParams, ErrorKind, Result};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Secret};
use kube::{
    api::{Api, DeleteParams, ListParams, Meta, PostParams},
    client::APIClient,
};
use knadmin_definitions::{
    registry, ClusterDomainClaim, ClusterDomainClaimSpec, InstallationMethod,
};

/// Namespace of the knative serving control plane
pub const KNATIVE_SERVING: &str = "knative-serving";
/// Autoscaler defaults config map
pub const CONFIG_AUTOSCALER: &str = "config-autoscaler";
/// Custom domain config map
pub const CONFIG_DOMAIN: &str = "config-domain";

/// Client creator
///
/// An explicit kubeconfig has already been exported by `AdminParams::init`,
/// otherwise in-cluster config wins over the default kubeconfig.
async fn make_client(params: &AdminParams) -> Result<APIClient> {
    let config = if params.kubeconfig.is_none() {
        match kube::config::incluster_config() {
            Ok(cfg) => cfg,
            Err(_) => kube::config::load_kube_config()
                .await
                .map_err(ErrorKind::KubeError)?,
        }
    } else {
        kube::config::load_kube_config()
            .await
            .map_err(ErrorKind::KubeError)?
    };
    Ok(kube::client::APIClient::new(config))
}

/// Interface for the kube objects kn-admin reads and writes
pub struct AdminKube {
    client: APIClient,
    configmaps: Api<ConfigMap>,
}

impl AdminKube {
    pub async fn new(params: &AdminParams) -> Result<Self> {
        let client = make_client(params).await?;
        let configmaps = Api::namespaced(client.clone(), KNATIVE_SERVING);
        Ok(Self { client, configmaps })
    }

    /// Fetch a config map from the serving namespace
    pub async fn get_configmap(&self, name: &str) -> Result<ConfigMap> {
        debug!("get configmap {}/{}", KNATIVE_SERVING, name);
        let cm = self.configmaps.get(name).await.map_err(ErrorKind::KubeError)?;
        Ok(cm)
    }

    /// Write back a config map fetched through `get_configmap`
    pub async fn replace_configmap(&self, cm: &ConfigMap) -> Result<ConfigMap> {
        let name = Meta::name(cm);
        debug!("replace configmap {}/{}", KNATIVE_SERVING, name);
        let pp = PostParams::default();
        let o = self
            .configmaps
            .replace(&name, &pp, cm)
            .await
            .map_err(ErrorKind::KubeError)?;
        Ok(o)
    }

    /// Work out how serving was installed from the owners of `config-domain`
    pub async fn installation_method(&self) -> Result<InstallationMethod> {
        let cm = self.get_configmap(CONFIG_DOMAIN).await?;
        let im = InstallationMethod::detect(&cm);
        debug!("installation method: {:?}", im);
        Ok(im)
    }

    /// Names of every namespace in the cluster
    pub async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let nss = api.list(&ListParams::default()).await.map_err(ErrorKind::KubeError)?;
        Ok(nss.iter().map(Meta::name).collect())
    }

    /// Registry secrets managed by kn-admin in a namespace
    pub async fn list_registry_secrets(&self, ns: &str) -> Result<Vec<Secret>> {
        debug!("list registry secrets in {}", ns);
        let api: Api<Secret> = Api::namespaced(self.client.clone(), ns);
        let lp = ListParams {
            label_selector: Some(registry::label_selector()),
            ..Default::default()
        };
        let secrets = api.list(&lp).await.map_err(ErrorKind::KubeError)?;
        Ok(secrets.items)
    }

    fn claims(&self) -> Api<ClusterDomainClaim> {
        Api::all(self.client.clone())
    }

    pub async fn create_claim(&self, name: &str, spec: ClusterDomainClaimSpec) -> Result<ClusterDomainClaim> {
        debug!("create cluster domain claim {} for namespace {}", name, spec.namespace);
        let cdc = ClusterDomainClaim::new(name, spec);
        let pp = PostParams::default();
        let o = self
            .claims()
            .create(&pp, &cdc)
            .await
            .map_err(ErrorKind::KubeError)?;
        Ok(o)
    }

    pub async fn list_claims(&self) -> Result<Vec<ClusterDomainClaim>> {
        let cdcs = self
            .claims()
            .list(&ListParams::default())
            .await
            .map_err(ErrorKind::KubeError)?;
        Ok(cdcs.items)
    }

    pub async fn delete_claim(&self, name: &str) -> Result<()> {
        debug!("delete cluster domain claim {}", name);
        let dp = DeleteParams::default();
        self.claims()
            .delete(name, &dp)
            .await
            .map_err(ErrorKind::KubeError)?;
        Ok(())
    }
}
