//! Spot Launch CLI
//!
//! Usage:
//!   spot_launch
//!   spot_launch -a has_arm:=True -a publish_point_clouds:=true
//!   spot_launch --args-file spot1.yaml --format plan

use spot_launch::{compile, render, AmentResolver, LaunchArgs, LaunchArguments, DECLARATIONS};

fn main() {
    let args: LaunchArgs = argh::from_env();

    // Initialize logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "error" => "error",
        "warn" => "warn",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };
    let env = env_logger::Env::default().default_filter_or(log_level);
    env_logger::init_from_env(env);

    if args.list_args {
        for decl in DECLARATIONS {
            println!("{} (default: {:?})", decl.name, decl.default);
            println!("    {}", decl.description);
        }
        return;
    }

    let mut launch_args = LaunchArguments::new();
    if let Some(ref path) = args.args_file {
        log::info!("Loading argument overrides: {}", path);
        launch_args = match launch_args.with_overrides_file(path) {
            Ok(a) => a,
            Err(e) => {
                log::error!("Failed to load argument overrides: {}", e);
                std::process::exit(1);
            }
        };
    }
    launch_args = match launch_args.with_overrides(args.arg.iter().cloned()) {
        Ok(a) => a,
        Err(e) => {
            log::error!("Invalid argument override: {}", e);
            std::process::exit(1);
        }
    };

    let resolver = AmentResolver::from_env();
    let topology = match compile(&launch_args, &resolver) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to compile launch topology: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Compiled topology with {} components (depth_registered_mode={}, point clouds={})",
        topology.components().len(),
        topology.depth_registered_mode,
        topology.publish_point_clouds
    );

    let rendered = match render(&topology, args.format) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Failed to render topology: {}", e);
            std::process::exit(1);
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, rendered) {
                log::error!("Failed to write '{}': {}", path, e);
                std::process::exit(1);
            }
            log::info!("Topology written to {}", path);
        }
        None => println!("{}", rendered),
    }
}
