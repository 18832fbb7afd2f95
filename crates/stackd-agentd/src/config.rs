use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use stackd_model::{Application, Attributes, Offer, Resource};
use stackd_observe::LoggerConfig;

/// Agent configuration, read from a JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentConfig {
    pub logger: LoggerConfig,
    /// Applications staged at startup, in order.
    pub applications: Vec<Application>,
    /// Hosts of the simulated resource manager.
    pub hosts: Vec<HostConfig>,
    /// Delay between offer rounds.
    pub tick_ms: u64,
    /// Give up after this many offer rounds.
    pub max_ticks: u32,
    /// redb file for lifecycle state; nothing is recorded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            logger: LoggerConfig::default(),
            applications: Vec::new(),
            hosts: Vec::new(),
            tick_ms: 500,
            max_ticks: 120,
            state_path: None,
        }
    }
}

impl AgentConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tick_ms == 0 {
            anyhow::bail!("tickMs must be greater than zero");
        }
        for app in &self.applications {
            app.validate()?;
        }
        if !self.applications.is_empty() && self.hosts.is_empty() {
            anyhow::bail!("applications configured but no hosts to run them on");
        }
        Ok(())
    }
}

/// A simulated host: one offer per round with these resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    pub hostname: String,
    pub cpus: f64,
    pub mem: f64,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Tasks launched here report `TASK_FAILED` instead of finishing.
    pub failing: bool,
}

impl HostConfig {
    /// Offer for round `round`; ids are unique per host and round.
    pub fn offer(&self, round: u32) -> Offer {
        let mut offer = Offer::new(format!("{}-{round}", self.hostname), &self.hostname)
            .with_resource(Resource::cpus(self.cpus))
            .with_resource(Resource::mem(self.mem));
        offer.attributes = self.attributes.clone();
        offer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AgentConfig::from_json("{}").unwrap();
        assert!(cfg.applications.is_empty());
        assert!(cfg.hosts.is_empty());
        assert_eq!(cfg.tick(), Duration::from_millis(500));
        assert!(cfg.state_path.is_none());
    }

    #[test]
    fn parses_full_document() {
        let cfg = AgentConfig::from_json(
            r#"{
                "logger": { "level": "debug", "format": "json" },
                "applications": [{
                    "id": "foo",
                    "cpu": 0.5,
                    "mem": 256,
                    "instances": "2",
                    "launchCommand": "sleep 1",
                    "constraints": [["hostname", "UNIQUE"]]
                }],
                "hosts": [
                    { "hostname": "slave0", "cpus": 2, "mem": 1024 },
                    { "hostname": "slave1", "cpus": 2, "mem": 1024, "failing": true,
                      "attributes": { "rack": "r1" } }
                ],
                "tickMs": 100,
                "statePath": "/tmp/stackd.redb"
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.applications[0].instance_count().unwrap(), 2);
        assert_eq!(cfg.hosts.len(), 2);
        assert!(cfg.hosts[1].failing);
        assert_eq!(cfg.tick_ms, 100);
        assert_eq!(cfg.state_path, Some(PathBuf::from("/tmp/stackd.redb")));
    }

    #[test]
    fn rejects_applications_without_hosts() {
        let err = AgentConfig::from_json(
            r#"{ "applications": [{ "id": "foo", "cpu": 1, "mem": 1, "instances": "1", "launchCommand": "true" }] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no hosts"));
    }

    #[test]
    fn rejects_invalid_application() {
        let raw = r#"{
            "applications": [{ "id": "foo", "cpu": 1, "mem": 1, "instances": "many", "launchCommand": "true" }],
            "hosts": [{ "hostname": "slave0", "cpus": 1, "mem": 1 }]
        }"#;
        assert!(AgentConfig::from_json(raw).is_err());
    }

    #[test]
    fn rejects_zero_tick() {
        assert!(AgentConfig::from_json(r#"{ "tickMs": 0 }"#).is_err());
    }

    #[test]
    fn host_offer_carries_resources_and_attributes() {
        let mut host = HostConfig {
            hostname: "slave0".into(),
            cpus: 1.5,
            mem: 2048.0,
            ..Default::default()
        };
        host.attributes.insert("rack", "r1");

        let offer = host.offer(3);
        assert_eq!(offer.id, "slave0-3");
        assert_eq!(offer.cpus(), 1.5);
        assert_eq!(offer.mem(), 2048.0);
        assert_eq!(offer.attribute("rack"), Some("r1"));
    }
}
