//! Human-readable rendering of a resolved topology

use super::assembler::{
    ContainerDescriptor, LaunchAction, NodeDescriptor, ParameterSource, ParameterValue,
    ResolvedTopology,
};
use std::fmt;

impl fmt::Display for ResolvedTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Launch Plan")?;
        writeln!(f, "===========")?;
        writeln!(f)?;
        writeln!(f, "Depth registered mode: {}", self.depth_registered_mode)?;
        writeln!(f, "Publish point clouds: {}", self.publish_point_clouds)?;
        let cameras: Vec<&str> = self.cameras.iter().map(|c| c.as_str()).collect();
        writeln!(f, "Cameras: {}", cameras.join(", "))?;
        if !self.tf_prefix.is_empty() {
            writeln!(f, "TF prefix: {}", self.tf_prefix)?;
        }
        writeln!(f)?;

        writeln!(f, "Actions (in launch order):")?;
        for (i, action) in self.actions().into_iter().enumerate() {
            writeln!(f)?;
            match action {
                LaunchAction::Node(node) => write_node(f, i + 1, node)?,
                LaunchAction::Include(include) => {
                    writeln!(f, "  {}. include {}", i + 1, include.launch_file.display())?;
                    for (key, value) in &include.launch_arguments {
                        writeln!(f, "       {}:={}", key, value)?;
                    }
                }
                LaunchAction::Container(container) => write_container(f, i + 1, container)?,
            }
        }

        Ok(())
    }
}

fn namespace_label(namespace: &str) -> String {
    if namespace.is_empty() {
        String::new()
    } else {
        format!(" [/{}]", namespace)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, index: usize, node: &NodeDescriptor) -> fmt::Result {
    writeln!(
        f,
        "  {}. {}/{}{}",
        index,
        node.package,
        node.executable,
        namespace_label(&node.namespace)
    )?;
    if !node.parameters.is_empty() {
        writeln!(f, "     Parameters:")?;
    }
    for source in &node.parameters {
        match source {
            ParameterSource::File(path) => writeln!(f, "       file: {}", path.display())?,
            ParameterSource::Values(values) => {
                for (key, value) in values {
                    match value {
                        ParameterValue::Bool(b) => writeln!(f, "       {}: {}", key, b)?,
                        ParameterValue::String(s) => writeln!(f, "       {}: {:?}", key, s)?,
                        ParameterValue::Command { command } => {
                            writeln!(f, "       {}: $({})", key, command.join(" "))?
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn write_container(
    f: &mut fmt::Formatter<'_>,
    index: usize,
    container: &ContainerDescriptor,
) -> fmt::Result {
    writeln!(
        f,
        "  {}. {} ({}/{}){}",
        index,
        container.name,
        container.package,
        container.executable,
        namespace_label(&container.namespace)
    )?;
    if container.components.is_empty() {
        writeln!(f, "     No components")?;
    }
    for component in &container.components {
        writeln!(f, "     - {} ({})", component.name, component.plugin)?;
        for remapping in &component.remappings {
            writeln!(f, "         {} -> {}", remapping.internal, remapping.external)?;
        }
    }
    Ok(())
}
