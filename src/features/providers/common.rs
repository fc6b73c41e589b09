use super::{FeatureData, FeatureProviderInput, capped_text};
use crate::features::{Capability, CapabilityError, FeatureProvider};

pub static COMMON_PROVIDERS: &[FeatureProvider] = &[
    FeatureProvider::new("Path", Capability::Any, path),
    FeatureProvider::new("FileName", Capability::Any, file_name),
    FeatureProvider::new("Directory", Capability::Any, directory),
    FeatureProvider::new("LineNumber", Capability::Any, line_number),
    FeatureProvider::new("EndsLineInFile", Capability::Any, ends_line_in_file),
    FeatureProvider::new("DisplayString", Capability::Any, display_string),
    FeatureProvider::new("IsTestFile", Capability::Any, is_test_file_feature),
];

const TEST_DIRS: &[&str] = &["/test/", "/tests/", "/_test/", "/__tests__/", "/__mocks__/", "/spec/", "/e2e/"];
const TEST_MARKERS: &[&str] = &["test_", "_test.", ".test.", ".spec.", "_spec.", ".e2e."];

/// Path conventions of JS/TS test suites, checked on a repository-relative path.
pub fn is_test_file(path: &str) -> bool {
    let lower = format!("/{}", path.to_lowercase());
    TEST_DIRS.iter().any(|dir| lower.contains(dir))
        || TEST_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn path(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::text(&input.entity_context.path))
}

fn file_name(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let path = &input.entity_context.path;
    let name = path.rsplit('/').next().unwrap_or(path);
    Ok(FeatureData::text(name))
}

/// Parent directory of the file, empty at the repository root.
fn directory(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    let path = &input.entity_context.path;
    let dir = path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    Ok(FeatureData::text(dir))
}

fn line_number(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::number(input.entity_view.key().start_line + 1))
}

fn ends_line_in_file(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::number(input.entity_view.key().end_line + 1))
}

fn display_string(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(capped_text(input, input.entity_view.display_string()))
}

fn is_test_file_feature(input: &FeatureProviderInput<'_>) -> Result<FeatureData, CapabilityError> {
    Ok(FeatureData::Flag(is_test_file(&input.entity_context.path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert!(is_test_file("src/users.test.ts"));
        assert!(is_test_file("src/users.spec.js"));
        assert!(is_test_file("test/app.js"));
        assert!(is_test_file("packages/api/__tests__/routes.js"));
        assert!(is_test_file("e2e/login.js"));
        assert!(!is_test_file("src/routes/users.js"));
        assert!(!is_test_file("src/contest.js"));
    }
}
