use crate::nn::module::Module;

/// Rendering options for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Spaces added per nesting level.
    pub indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig { indent: 2 }
    }
}

impl FormatConfig {
    pub fn with_indent(indent: usize) -> Self {
        FormatConfig { indent }
    }
}

/// Renders the module tree, one child per line:
///
/// ```text
/// ModuleA1(
///   (a): ModuleA2()
///   (b): ModuleA3(
///     (c): ModuleA4()
///   )
/// )
/// ```
pub fn render(module: &dyn Module, config: &FormatConfig) -> String {
    let mut out = String::new();
    render_into(module, config, 0, &mut out);
    out
}

fn render_into(module: &dyn Module, config: &FormatConfig, depth: usize, out: &mut String) {
    out.push_str(module.type_name());
    out.push('(');
    let state = module.state();
    if state.num_children() == 0 {
        out.push(')');
        return;
    }
    out.push('\n');
    let pad = " ".repeat(config.indent * (depth + 1));
    for (name, child) in state.named_children() {
        out.push_str(&pad);
        out.push('(');
        out.push_str(name);
        out.push_str("): ");
        render_into(child, config, depth + 1, out);
        out.push('\n');
    }
    out.push_str(&" ".repeat(config.indent * depth));
    out.push(')');
}
