//! Command-line interface for spot_launch

use argh::FromArgs;
use std::str::FromStr;

/// Compile Spot driver launch arguments into a component topology
#[derive(FromArgs, Debug)]
pub struct LaunchArgs {
    /// override launch arguments (format: key:=value)
    #[argh(option, short = 'a', from_str_fn(parse_arg_override))]
    pub arg: Vec<(String, String)>,

    /// YAML file of argument overrides, applied before --arg
    #[argh(option)]
    pub args_file: Option<String>,

    /// output format: yaml, json or plan (default: yaml)
    #[argh(option, short = 'f', default = "OutputFormat::Yaml")]
    pub format: OutputFormat,

    /// write the topology to this file instead of stdout
    #[argh(option, short = 'o')]
    pub output: Option<String>,

    /// list declared launch arguments and exit
    #[argh(switch)]
    pub list_args: bool,

    /// log level (error, warn, info, debug, trace)
    #[argh(option, short = 'l', default = "String::from(\"info\")")]
    pub log_level: String,
}

/// Serialization of the compiled topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
    /// Human-readable launch plan
    Plan,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "plan" => Ok(OutputFormat::Plan),
            _ => Err(format!(
                "Invalid format '{}'. Expected one of: yaml, json, plan",
                s
            )),
        }
    }
}

/// Parse argument override in format "key:=value"
fn parse_arg_override(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, ":=").collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid argument format '{}'. Expected 'key:=value'",
            s
        ));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}
