//! Project scaffolds that can seed a new project with starter files.

use crate::error::CoreError;
use crate::files::FileWrite;

/// Names accepted in `CreateProjectRequest::template`.
pub const TEMPLATE_NAMES: &[&str] = &["react", "node-api", "python-cli"];

/// Resolve a template name into its starter files.
///
/// The returned name is the canonical tag stored in `template_used`.
pub fn scaffold(template: &str, project_name: &str) -> Result<(&'static str, Vec<FileWrite>), CoreError> {
    match template.trim().to_ascii_lowercase().as_str() {
        "react" => Ok(("react", react(project_name))),
        "node-api" => Ok(("node-api", node_api(project_name))),
        "python-cli" => Ok(("python-cli", python_cli(project_name))),
        other => Err(CoreError::Validation(format!(
            "Unknown template '{other}' (available: {})",
            TEMPLATE_NAMES.join(", ")
        ))),
    }
}

fn package_name(project_name: &str) -> String {
    let slug: String = project_name
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "app".to_string()
    } else {
        slug
    }
}

fn react(project_name: &str) -> Vec<FileWrite> {
    let package = package_name(project_name);
    vec![
        FileWrite::new(
            "package.json",
            format!(
                r#"{{
  "name": "{package}",
  "private": true,
  "scripts": {{ "dev": "vite", "build": "vite build" }},
  "dependencies": {{ "react": "^18.3.0", "react-dom": "^18.3.0" }},
  "devDependencies": {{ "vite": "^5.0.0", "typescript": "^5.4.0" }}
}}
"#
            ),
        ),
        FileWrite::new(
            "src/main.tsx",
            "import { createRoot } from \"react-dom/client\";\nimport App from \"./App\";\n\ncreateRoot(document.getElementById(\"root\")!).render(<App />);\n",
        ),
        FileWrite::new(
            "src/App.tsx",
            format!("export default function App() {{\n  return <h1>{}</h1>;\n}}\n", project_name.trim()),
        ),
    ]
}

fn node_api(project_name: &str) -> Vec<FileWrite> {
    let package = package_name(project_name);
    vec![
        FileWrite::new(
            "package.json",
            format!(
                r#"{{
  "name": "{package}",
  "main": "src/index.js",
  "scripts": {{ "start": "node src/index.js" }},
  "dependencies": {{ "express": "^4.19.0" }}
}}
"#
            ),
        ),
        FileWrite::new(
            "src/index.js",
            "const express = require(\"express\");\n\nconst app = express();\napp.use(express.json());\n\napp.get(\"/health\", (_req, res) => res.json({ status: \"ok\" }));\n\napp.listen(process.env.PORT || 3000);\n",
        ),
    ]
}

fn python_cli(project_name: &str) -> Vec<FileWrite> {
    let package = package_name(project_name).replace('-', "_");
    vec![
        FileWrite::new(
            "pyproject.toml",
            format!("[project]\nname = \"{package}\"\nversion = \"0.1.0\"\nrequires-python = \">=3.10\"\n"),
        ),
        FileWrite::new(
            "main.py",
            "import argparse\n\n\ndef main() -> None:\n    parser = argparse.ArgumentParser()\n    parser.parse_args()\n    print(\"Hello\")\n\n\nif __name__ == \"__main__\":\n    main()\n",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn every_listed_template_resolves() {
        for name in TEMPLATE_NAMES {
            let (tag, files) = scaffold(name, "My App").unwrap();
            assert_eq!(tag, *name);
            assert!(!files.is_empty());
        }
    }

    #[test]
    fn template_names_are_case_insensitive() {
        let (tag, _) = scaffold(" React ", "x").unwrap();
        assert_eq!(tag, "react");
    }

    #[test]
    fn unknown_template_is_a_validation_error() {
        assert_matches!(scaffold("rails", "x"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn package_name_is_slugged() {
        let (_, files) = scaffold("node-api", "My Cool API!").unwrap();
        let manifest = files.iter().find(|f| f.file_path == "package.json").unwrap();
        assert!(manifest.content.contains("\"name\": \"my-cool-api\""));
        assert_eq!(manifest.file_type, "json");
    }
}
