//! Descriptor parsing and validation
//!
//! Turns descriptor file contents into validated [`ModuleDescriptor`] and
//! [`TargetDescriptor`] values. File discovery and reading live in
//! `infra::discovery`; everything here works on strings.
//!
//! Include paths may reference `${NAME}` variables. Values come from the
//! configuration layers first, then the process environment.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::module::{ModuleDeps, ModuleDescriptor};
use crate::core::target::TargetDescriptor;
use crate::error::DescriptorError;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("pattern is valid")
    })
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("pattern is valid"))
}

fn definition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(=.*)?$").expect("pattern is valid")
    })
}

/// Replace `${NAME}` references in a string
///
/// `vars` takes precedence over the process environment. A reference with no
/// value in either is an error.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use buildrules::core::descriptor::substitute_vars;
///
/// let mut vars = BTreeMap::new();
/// vars.insert("ENGINE_DIR".to_string(), "/opt/engine".to_string());
/// let result = substitute_vars("${ENGINE_DIR}/Source", &vars, "Core").unwrap();
/// assert_eq!(result, "/opt/engine/Source");
/// ```
pub fn substitute_vars(
    input: &str,
    vars: &BTreeMap<String, String>,
    origin: &str,
) -> Result<String, DescriptorError> {
    substitute_with(input, origin, |name| {
        vars.get(name).cloned().or_else(|| std::env::var(name).ok())
    })
}

/// Replace `${NAME}` references using `lookup`
fn substitute_with<F>(input: &str, origin: &str, lookup: F) -> Result<String, DescriptorError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut last_end = 0;
    let mut output = String::with_capacity(input.len());

    for cap in variable_pattern().captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let var_name = &cap[1];

        output.push_str(&input[last_end..full_match.start()]);

        let value = lookup(var_name).ok_or_else(|| DescriptorError::UndefinedVariable {
            name: var_name.to_string(),
            origin: origin.to_string(),
        })?;
        output.push_str(&value);

        last_end = full_match.end();
    }

    output.push_str(&input[last_end..]);
    Ok(output)
}

fn substitute_paths(
    paths: &mut [String],
    vars: &BTreeMap<String, String>,
    origin: &str,
) -> Result<(), DescriptorError> {
    for path in paths.iter_mut() {
        *path = substitute_vars(path, vars, origin)?;
    }
    Ok(())
}

fn substitute_deps(
    deps: &mut ModuleDeps,
    vars: &BTreeMap<String, String>,
    origin: &str,
) -> Result<(), DescriptorError> {
    substitute_paths(&mut deps.public_include_paths, vars, origin)?;
    substitute_paths(&mut deps.private_include_paths, vars, origin)
}

/// Check an identifier against the naming rules
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), DescriptorError> {
    if name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(DescriptorError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Check a `NAME` or `NAME=VALUE` definition
pub fn validate_definition(origin: &str, definition: &str) -> Result<(), DescriptorError> {
    if definition_pattern().is_match(definition) {
        Ok(())
    } else {
        Err(DescriptorError::InvalidDefinition {
            origin: origin.to_string(),
            definition: definition.to_string(),
        })
    }
}

/// Validate every name and definition a module declares
pub fn validate_module(module: &ModuleDescriptor) -> Result<(), DescriptorError> {
    validate_name("module", &module.name)?;

    for deps in std::iter::once(&module.deps).chain(module.conditionals.iter().map(|c| &c.effect))
    {
        for referenced in deps
            .link_dependencies()
            .chain(deps.private_include_path_modules.iter())
            .chain(deps.dynamically_loaded_modules.iter())
        {
            validate_name("module", referenced)?;
        }
        for library in &deps.third_party_static_dependencies {
            validate_name("third-party library", library)?;
        }
        for definition in &deps.public_definitions {
            validate_definition(&module.name, definition)?;
        }
    }

    Ok(())
}

/// Validate every name and definition a target declares
pub fn validate_target(target: &TargetDescriptor) -> Result<(), DescriptorError> {
    validate_name("target", &target.name)?;

    for module in target.seed_modules() {
        validate_name("module", module)?;
    }

    let definitions = target
        .global_definitions
        .iter()
        .chain(target.conditionals.iter().flat_map(|c| c.definitions.iter()));
    for definition in definitions {
        validate_definition(&target.name, definition)?;
    }

    Ok(())
}

/// Parse and validate a module descriptor
///
/// `path` is used for error reporting and becomes the module's base
/// directory (its parent).
pub fn parse_module(
    content: &str,
    path: &Path,
    vars: &BTreeMap<String, String>,
) -> Result<ModuleDescriptor, DescriptorError> {
    let mut module = ModuleDescriptor::from_toml(content).map_err(|e| DescriptorError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    validate_module(&module)?;

    let origin = module.name.clone();
    substitute_deps(&mut module.deps, vars, &origin)?;
    for clause in &mut module.conditionals {
        substitute_deps(&mut clause.effect, vars, &origin)?;
    }

    module.base_dir = path.parent().map(Path::to_path_buf);

    tracing::debug!("Loaded module {} from {}", module.name, path.display());
    Ok(module)
}

/// Parse and validate a target descriptor
pub fn parse_target(content: &str, path: &Path) -> Result<TargetDescriptor, DescriptorError> {
    let target = TargetDescriptor::from_toml(content).map_err(|e| DescriptorError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    validate_target(&target)?;

    tracing::debug!("Loaded target {} from {}", target.name, path.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::generators::{definition, module_name};
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    /// Lookup that layers `config` over a stand-in process environment
    fn layered<'a>(
        config: &'a BTreeMap<String, String>,
        env: &'a BTreeMap<String, String>,
    ) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| config.get(name).or_else(|| env.get(name)).cloned()
    }

    #[test]
    fn test_substitution_prefers_config_vars() {
        let config = vars(&[("ENGINE_DIR", "from-config")]);
        let env = vars(&[("ENGINE_DIR", "from-env")]);

        let result = substitute_with("${ENGINE_DIR}/Public", "Core", layered(&config, &env));
        assert_eq!(result.unwrap(), "from-config/Public");
    }

    #[test]
    fn test_substitution_falls_back_to_env() {
        let config = BTreeMap::new();
        let env = vars(&[("ENGINE_DIR", "/engine")]);

        let result = substitute_with("${ENGINE_DIR}/Source", "Core", layered(&config, &env));
        assert_eq!(result.unwrap(), "/engine/Source");
    }

    #[test]
    fn test_process_environment_is_consulted() {
        // PATH is set in any environment the tests run in
        let expected = std::env::var("PATH").unwrap();
        let result = substitute_vars("${PATH}", &BTreeMap::new(), "Core").unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_undefined_variable_is_error() {
        let err = substitute_vars("${BUILDRULES_TEST_NOT_SET_ANYWHERE}", &BTreeMap::new(), "App")
            .unwrap_err();
        assert!(matches!(
            err,
            DescriptorError::UndefinedVariable { ref name, ref origin }
                if name == "BUILDRULES_TEST_NOT_SET_ANYWHERE" && origin == "App"
        ));
    }

    #[test]
    fn test_text_without_references_is_unchanged() {
        let input = "Runtime/Core/Public $HOME {x}";
        assert_eq!(substitute_vars(input, &BTreeMap::new(), "Core").unwrap(), input);
    }

    #[test]
    fn test_parse_module_sets_base_dir_and_substitutes() {
        let content = r#"
name = "Core"
public_include_paths = ["${ROOT}/Core/Public"]

[[conditionals]]
when = { group = "Unix" }
private_include_paths = ["${ROOT}/Core/Private/Unix"]
"#;
        let path = PathBuf::from("Source/Core/Core.module.toml");
        let module = parse_module(content, &path, &vars(&[("ROOT", "/src")])).unwrap();

        assert_eq!(module.base_dir, Some(PathBuf::from("Source/Core")));
        assert_eq!(module.deps.public_include_paths, vec!["/src/Core/Public"]);
        assert_eq!(
            module.conditionals[0].effect.private_include_paths,
            vec!["/src/Core/Private/Unix"]
        );
    }

    #[test]
    fn test_parse_module_reports_path_on_bad_toml() {
        let path = PathBuf::from("Broken.module.toml");
        let err = parse_module("name = ", &path, &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, DescriptorError::Parse { path: ref p, .. } if p == &path));
    }

    #[test]
    fn test_invalid_dependency_name_rejected() {
        let content = r#"
name = "App"
public_dependencies = ["Core-Runtime"]
"#;
        let err = parse_module(content, Path::new("App.module.toml"), &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, DescriptorError::InvalidName { kind: "module", .. }));
    }

    #[test]
    fn test_invalid_third_party_library_rejected() {
        let content = r#"
name = "FModel"

[[conditionals]]
when = { platform = "Mac" }
third_party_static_dependencies = ["CEF 3"]
"#;
        let err = parse_module(content, Path::new("FModel.module.toml"), &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            DescriptorError::InvalidName { kind: "third-party library", .. }
        ));
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let content = r#"
name = "Viewer"
output_kind = "program"
root_module = "Viewer"
global_definitions = ["=1"]
"#;
        let err = parse_target(content, Path::new("Viewer.target.toml")).unwrap_err();
        assert!(matches!(err, DescriptorError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_conditional_target_definitions_validated() {
        let content = r#"
name = "Viewer"
output_kind = "program"
root_module = "Viewer"

[[conditionals]]
when = { platform = "Mac" }
definitions = ["1BAD"]
"#;
        assert!(parse_target(content, Path::new("Viewer.target.toml")).is_err());
    }

    #[test]
    fn test_valid_target_parses() {
        let content = r#"
name = "Viewer"
output_kind = "program"
root_module = "Viewer"
extra_modules = ["Style"]
global_definitions = ["USE_IO_DISPATCHER=1", "WITH_EDITOR"]
"#;
        let target = parse_target(content, Path::new("Viewer.target.toml")).unwrap();
        assert_eq!(target.extra_modules, vec!["Style"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_generated_names_are_valid(name in module_name()) {
            prop_assert!(validate_name("module", &name).is_ok());
        }

        #[test]
        fn test_generated_definitions_are_valid(def in definition()) {
            prop_assert!(validate_definition("Target", &def).is_ok());
        }

        #[test]
        fn test_names_with_separators_are_invalid(
            head in module_name(),
            sep in "[-. /]",
            tail in module_name(),
        ) {
            let name = format!("{head}{sep}{tail}");
            prop_assert!(validate_name("module", &name).is_err());
        }
    }
}
