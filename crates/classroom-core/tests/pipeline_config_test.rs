//! Tests for loading pipeline configuration from disk.

use classroom_core::{
    AgentRole, CommunicationMode, ConfigError, PipelineConfig, Workflow, load_json, save_json,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/agents.json")
}

#[test]
fn test_sample_config_declares_every_role() {
    let config = PipelineConfig::load(sample_config_path()).unwrap();

    for role in AgentRole::ALL {
        assert!(config.contains_agent(role.as_str()), "missing {role}");
        assert!(config.template(role.as_str()).is_some(), "no template for {role}");
    }
}

#[test]
fn test_sample_config_modes_follow_workflow() {
    let config = PipelineConfig::load(sample_config_path()).unwrap();
    let workflow = Workflow::default();

    // every stage declares how it talks to the next one
    for stage in workflow.stages() {
        if let Some(next) = workflow.next_agent(&stage.agent) {
            assert!(
                config.communication_mode(&stage.agent, next).is_some(),
                "{} -> {next} undeclared",
                stage.agent
            );
        }
    }
    assert_eq!(
        config.communication_mode("supervisor", "foreman"),
        Some(CommunicationMode::Json)
    );
}

#[test]
fn test_sample_config_renders_task() {
    let config = PipelineConfig::load(sample_config_path()).unwrap();
    let prompt = config.render_prompt("supervisor", "the Pythagorean theorem").unwrap();
    assert!(prompt.contains("a video about the Pythagorean theorem."));
    assert!(!prompt.contains("{{"));
}

#[test]
fn test_malformed_file_degrades_to_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agents.json");
    fs::write(&path, "{\"supervisor\": ").unwrap();

    let config = PipelineConfig::load(&path).unwrap();
    assert!(config.is_empty());
}

#[test]
fn test_invalid_structure_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agents.json");
    let document = json!({
        "supervisor": {"prompt": "p", "agent_communication": {"editor": {"mode": "text"}}}
    });
    save_json(&document, &path).unwrap();

    assert!(matches!(
        PipelineConfig::load(&path),
        Err(ConfigError::UnknownCommunicationTarget { .. })
    ));
}

#[test]
fn test_saved_config_keeps_document_shape() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("agents.json");

    let config = PipelineConfig::from_value(&json!({
        "supervisor": {
            "prompt": "Design {{task}}",
            "agent_communication": {"foreman": {"mode": "json"}}
        },
        "foreman": {"prompt_template": "Interpret {{task}}"}
    }))
    .unwrap();
    config.save(&path).unwrap();

    assert_eq!(
        load_json(&path),
        json!({
            "foreman": {"prompt_template": "Interpret {{task}}"},
            "supervisor": {
                "prompt_template": "Design {{task}}",
                "agent_communication": {"foreman": {"mode": "json"}}
            }
        })
    );
}
