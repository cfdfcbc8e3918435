use std::env;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{Level, debug, info};

use mir_log::{LogConfig, init_logging};
use mir_props::PropertyMirror;
use mir_scene::{ChangeKind, Component, PluginHost, Scene, SceneRegistry};
use mir_schema::Validatable;

mod config;
use config::Config;

const VERSION: &str = "0.1.0";

/// Get default config path based on executable location
fn default_config_path() -> String {
    env::current_exe()
        .ok()
        .and_then(|exe_path| {
            let stem = exe_path.file_stem()?;
            let parent = exe_path.parent()?;
            Some(parent.join(stem).with_extension("json"))
        })
        .and_then(|path| path.to_str().map(|s| s.to_string()))
        .unwrap_or_else(|| "./mir_host.json".to_string())
}

/// Mirador Host - scene harness for the property mirror plugin
#[derive(Parser, Debug)]
#[command(name = "mir_host")]
#[command(version = VERSION)]
#[command(about = "Mirador scene host harness", long_about = None)]
struct Args {
    /// Path to configuration file (JSON)
    #[arg(short, long, default_value_t = default_config_path())]
    config: String,

    /// Enable logging to file (mir_host.log in current directory)
    #[arg(long, env = "MIR_LOG_FILE")]
    log_file: bool,
}

fn main() {
    let args = Args::parse();

    // Load configuration first to get log level
    // We can't log errors yet, so we use eprintln! for early failures
    let config = if Path::new(&args.config).exists() {
        match Config::from_json_file(&args.config) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load config from '{}': {}", args.config, e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Parse log level from config
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Warning: Invalid log level '{}', using INFO",
                config.log_level
            );
            Level::INFO
        }
    };

    // Setup logging with configured log level
    let log_config = if args.log_file {
        let file = std::fs::File::create("mir_host.log").expect("Unable to create mir_host.log");
        LogConfig::new("mir_host::")
            .with_level(log_level)
            .with_log_file(file)
    } else {
        LogConfig::<std::fs::File>::new("mir_host::").with_level(log_level)
    };

    init_logging(log_config).expect("Failed to initialize logging");

    info!("{} v{}", config.name, VERSION);
    info!("Configuration: {}", args.config);

    debug!("Settings:");
    debug!("  Log Level: {}", config.log_level);
    debug!("  Scenes: {:?}", config.scenes);
    debug!("  Removal Policy: {:?}", config.mirror.removal);

    // 1. Register plugins before any scene exists, so every scene-added
    //    event is observed
    let registry = SceneRegistry::new();
    let plugins = PluginHost::new(Arc::clone(&registry));
    plugins.register(Arc::new(PropertyMirror::from_config(config.mirror.clone())));
    info!("Registered plugins: {:?}", plugins.list());

    // 2. Create the configured scenes
    for name in &config.scenes {
        if let Err(e) = registry.create_scene(name) {
            eprintln!("Failed to create scene '{}': {}", name, e);
            std::process::exit(1);
        }
    }

    // 3. Drive a component lifecycle through each scene and show the
    //    resulting script-facing property bags
    for name in &config.scenes {
        let scene = registry.scene(name).expect("scene created above");
        drive_scene(&scene);
    }

    info!("Done");
}

/// Exercise one scene: attach components, report the mirrored properties,
/// then detach and report again
fn drive_scene(scene: &Arc<Scene>) {
    let avatar = scene.create_entity();

    let placeable = Component::named("EC_OgrePlaceable", "avatar_pos");
    let mesh = Component::named("EC_OgreMesh", "avatar_mesh");
    let netpos = Component::new("EC_NetworkPosition");

    mesh.set_attribute("mesh_ref", serde_json::json!("avatar.mesh"));

    scene
        .add_component(&avatar, Arc::clone(&placeable), ChangeKind::Replicate)
        .expect("entity belongs to this scene");
    scene
        .add_component(&avatar, Arc::clone(&mesh), ChangeKind::Replicate)
        .expect("entity belongs to this scene");
    scene
        .add_component(&avatar, Arc::clone(&netpos), ChangeKind::LocalOnly)
        .expect("entity belongs to this scene");

    let mut names: Vec<String> = avatar.dynamic_property_names().into_iter().collect();
    names.sort();
    info!(
        scene = %scene.name(),
        "entity {} script properties after attach: {:?}",
        avatar.id(),
        names
    );

    // The mirrored reference is live: attribute changes made through the
    // component are visible through the property bag
    mesh.set_attribute("mesh_ref", serde_json::json!("avatar_v2.mesh"));
    if let Some(value) = avatar
        .property("mesh")
        .and_then(|p| p.as_component().cloned())
        .and_then(|c| c.attribute("mesh_ref"))
    {
        info!(scene = %scene.name(), "mesh reference now {}", value);
    }

    scene
        .remove_component(&avatar, mesh.id(), ChangeKind::Replicate)
        .expect("mesh attached above");

    let mut names: Vec<String> = avatar.dynamic_property_names().into_iter().collect();
    names.sort();
    info!(
        scene = %scene.name(),
        "entity {} script properties after detach: {:?}",
        avatar.id(),
        names
    );
}
