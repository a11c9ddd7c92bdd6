#![allow(dead_code)]

use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use knadmin::Result;
use knadmin_definitions::registry::{
    ADMIN_REGISTRY_CMD_NAME, DOCKER_JSON_NAME, IMAGE_PULL_SERVICE_ACCOUNT, LABEL_MANAGED_BY,
};
use maplit::btreemap;
use std::{collections::BTreeMap, sync::Once};

static START: Once = Once::new();

/// Quiet logging for all tests
pub fn setup() {
    START.call_once(|| {
        loggerv::Logger::new()
            .verbosity(1)
            .module_path(true)
            .line_numbers(true)
            .init()
            .unwrap();
    });
}

/// Capture what a printer writes
pub fn render<F>(f: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let mut out = vec![];
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

pub fn configmap(name: &str, data: BTreeMap<String, String>) -> ConfigMap {
    ConfigMap {
        metadata: Some(ObjectMeta {
            name: Some(name.into()),
            namespace: Some("knative-serving".into()),
            ..ObjectMeta::default()
        }),
        data: Some(data),
        ..ConfigMap::default()
    }
}

/// A registry secret as `registry add` would have created it
pub fn registry_secret(ns: &str, name: &str, sa: &str, docker: serde_json::Value) -> Secret {
    Secret {
        metadata: Some(ObjectMeta {
            name: Some(name.into()),
            namespace: Some(ns.into()),
            labels: Some(btreemap! {
                LABEL_MANAGED_BY.to_string() => ADMIN_REGISTRY_CMD_NAME.to_string(),
                IMAGE_PULL_SERVICE_ACCOUNT.to_string() => sa.to_string(),
            }),
            ..ObjectMeta::default()
        }),
        data: Some(btreemap! {
            DOCKER_JSON_NAME.to_string() => ByteString(docker.to_string().into_bytes()),
        }),
        type_: Some("kubernetes.io/dockerconfigjson".into()),
        ..Secret::default()
    }
}
