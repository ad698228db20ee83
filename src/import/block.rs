use crate::naming::{hcl_escape, sanitize_name};

/// One Terraform `import` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBlock {
    /// `<tf_type>.<local_name>`
    pub resource_address: String,
    /// Provider-side id, verbatim
    pub resource_id: String,
}

impl ImportBlock {
    /// Build a block, sanitizing the display name into the local name
    pub fn new(terraform_type: &str, name: &str, resource_id: &str) -> Self {
        Self {
            resource_address: format!("{}.{}", terraform_type, sanitize_name(name)),
            resource_id: resource_id.to_string(),
        }
    }

    /// Render as HCL, terminated by a newline
    pub fn render(&self) -> String {
        format!(
            "import {{\n  to = {}\n  id = \"{}\"\n}}\n",
            self.resource_address,
            hcl_escape(&self.resource_id)
        )
    }
}

/// Render blocks in order with one blank line between them
pub fn render_blocks(blocks: &[ImportBlock]) -> String {
    blocks
        .iter()
        .map(ImportBlock::render)
        .collect::<Vec<_>>()
        .join("\n")
}
