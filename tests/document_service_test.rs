//! Tests for DocumentService: schema and values files through to rendered output

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use tempfile::TempDir;

use claimdoc::application::services::DocumentService;
use claimdoc::application::{ApplicationError, RenderOptions, Renderer, XmlRenderer};
use claimdoc::config::Settings;
use claimdoc::domain::DomainError;
use claimdoc::infrastructure::di::ServiceContainer;
use claimdoc::infrastructure::traits::{FileSystem, RealFileSystem};
use claimdoc::util::testing;

const SCHEMA: &str = r#"
[document]
root = "Claim"

[document.attributes]
xmlns = "http://example.org/claim"
version = "2"

[[groups.root]]
field = "surname"
path = "Claimant/Surname"

[[groups.root]]
field = "jobs"
path = "Employment/Job"
group = "job"

[[groups.job]]
field = "employer"
path = "Employer"
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write file");
    path
}

#[fixture]
fn workspace() -> (TempDir, PathBuf) {
    testing::init_test_setup();
    let temp = TempDir::new().expect("temp dir");
    let schema = write(temp.path(), "claim.toml", SCHEMA);
    (temp, schema)
}

fn service() -> DocumentService {
    DocumentService::new(Arc::new(RealFileSystem))
}

#[rstest]
fn given_schema_file_when_loading_then_root_attributes_keep_file_order(
    workspace: (TempDir, PathBuf),
) {
    let (_temp, schema_path) = workspace;

    let schema = service().load_schema(&schema_path).expect("load schema");

    assert_eq!(schema.root_name(), "Claim");
    assert_eq!(schema.group(), "root");
    let keys: Vec<_> = schema.root_attributes().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["xmlns", "version"]);
    assert!(schema.table().contains_group("job"));
}

#[rstest]
fn given_values_file_when_building_then_renders_expected_xml(workspace: (TempDir, PathBuf)) {
    let (temp, schema_path) = workspace;
    let values = write(
        temp.path(),
        "alice.toml",
        r#"
surname = "Smith"

[[jobs]]
employer = "Acme"

[[jobs]]
employer = "Globex"
"#,
    );
    let service = service();
    let schema = service.load_schema(&schema_path).expect("load schema");

    let document = service.build(&schema, &values).expect("build");
    let xml = XmlRenderer::new(RenderOptions {
        xml_declaration: false,
        ..RenderOptions::default()
    })
    .render(&document)
    .expect("render");

    assert_eq!(
        xml,
        concat!(
            r#"<Claim xmlns="http://example.org/claim" version="2">"#,
            "<Claimant><Surname>Smith</Surname></Claimant>",
            "<Employment>",
            r#"<Job order="0"><Employer>Acme</Employer></Job>"#,
            r#"<Job order="1"><Employer>Globex</Employer></Job>"#,
            "</Employment>",
            "</Claim>",
        )
    );
}

#[rstest]
fn given_numeric_value_when_building_then_error_names_file_and_field(
    workspace: (TempDir, PathBuf),
) {
    let (temp, schema_path) = workspace;
    let values = write(temp.path(), "bad.toml", "surname = 42\n");
    let service = service();
    let schema = service.load_schema(&schema_path).expect("load schema");

    let err = service.build(&schema, &values).expect_err("should fail");

    assert_eq!(
        err.domain(),
        Some(&DomainError::InvalidFieldValue {
            field: "surname".to_string(),
            found: "integer".to_string(),
        })
    );
    assert!(err.to_string().contains("bad.toml"), "{err}");
}

#[rstest]
fn given_missing_values_file_when_building_then_operation_failed(workspace: (TempDir, PathBuf)) {
    let (temp, schema_path) = workspace;
    let service = service();
    let schema = service.load_schema(&schema_path).expect("load schema");

    let err = service
        .build(&schema, &temp.path().join("nope.toml"))
        .expect_err("should fail");

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[rstest]
#[case::unknown_key("[document]\nroot = \"Claim\"\nextra = 1\n")]
#[case::missing_root("[document]\ngroup = \"root\"\n")]
#[case::non_string_attribute("[document]\nroot = \"Claim\"\n[document.attributes]\nversion = 2\n[groups]\nroot = []\n")]
fn given_invalid_schema_file_when_loading_then_schema_error(#[case] content: &str) {
    let temp = TempDir::new().expect("temp dir");
    let path = write(temp.path(), "schema.toml", content);

    let err = service().load_schema(&path).expect_err("should fail");

    assert!(matches!(err, ApplicationError::Schema { .. }), "{err:?}");
}

#[rstest]
#[case::missing_top_group("[document]\nroot = \"Claim\"\n", "unknown mapping group: root")]
#[case::dangling_reference(
    "[document]\nroot = \"Claim\"\n[[groups.root]]\nfield = \"jobs\"\npath = \"Job\"\ngroup = \"job\"\n",
    "unknown mapping group: job"
)]
#[case::bad_path(
    "[document]\nroot = \"Claim\"\n[[groups.root]]\nfield = \"name\"\npath = \"A//B\"\n",
    "malformed path expression"
)]
fn given_inconsistent_schema_when_loading_then_domain_error_in_file(
    #[case] content: &str,
    #[case] message: &str,
) {
    let temp = TempDir::new().expect("temp dir");
    let path = write(temp.path(), "schema.toml", content);

    let err = service().load_schema(&path).expect_err("should fail");

    assert!(matches!(err, ApplicationError::InFile { .. }), "{err:?}");
    assert!(err.to_string().contains(message), "{err}");
}

#[rstest]
fn given_several_values_files_when_building_batch_then_results_keep_input_order(
    workspace: (TempDir, PathBuf),
) {
    let (temp, schema_path) = workspace;
    let sources: Vec<PathBuf> = (0..8)
        .map(|i| {
            let content = if i == 5 {
                "surname = true\n".to_string()
            } else {
                format!("surname = \"Person{i}\"\n")
            };
            write(temp.path(), &format!("claim{i}.toml"), &content)
        })
        .collect();
    let service = service();
    let schema = service.load_schema(&schema_path).expect("load schema");

    let outcomes = service.build_batch(&schema, &sources);

    assert_eq!(outcomes.len(), sources.len());
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.source, sources[i]);
        match &outcome.result {
            Ok(document) => assert_eq!(
                document
                    .root()
                    .descendant("Claimant/Surname")
                    .and_then(|n| n.text()),
                Some(format!("Person{i}").as_str())
            ),
            Err(e) => assert_eq!(i, 5, "unexpected failure: {e}"),
        }
    }
    assert!(outcomes[5].result.is_err());
}

#[rstest]
fn given_unwritable_target_when_writing_batch_then_other_documents_still_written(
    workspace: (TempDir, PathBuf),
) {
    let (temp, schema_path) = workspace;
    let sources: Vec<PathBuf> = (0..3)
        .map(|i| {
            write(
                temp.path(),
                &format!("claim{i}.toml"),
                &format!("surname = \"Person{i}\"\n"),
            )
        })
        .collect();
    let out = temp.path().join("out");
    // a directory where claim1.xml should go cannot be overwritten by a file
    fs::create_dir_all(out.join("claim1.xml")).expect("blocking dir");
    let service = service();
    let schema = service.load_schema(&schema_path).expect("load schema");

    let outcomes = service.write_batch(&schema, &sources, &XmlRenderer::default(), &out);

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        outcomes[1].result,
        Err(ApplicationError::OperationFailed { .. })
    ));
    for i in [0, 2] {
        let target = outcomes[i].result.as_ref().expect("written");
        assert_eq!(target, &out.join(format!("claim{i}.xml")));
        let written = fs::read_to_string(target).expect("read output");
        assert!(written.contains(&format!("<Surname>Person{i}</Surname>")));
    }
}

#[rstest]
fn given_build_failure_in_batch_when_writing_then_only_that_entry_fails(
    workspace: (TempDir, PathBuf),
) {
    let (temp, schema_path) = workspace;
    let good = write(temp.path(), "good.toml", "surname = \"Smith\"\n");
    let bad = write(temp.path(), "bad.toml", "surname = 1.5\n");
    let out = temp.path().join("out");
    let service = service();
    let schema = service.load_schema(&schema_path).expect("load schema");

    let outcomes = service.write_batch(&schema, &[bad, good], &XmlRenderer::default(), &out);

    assert!(outcomes[0].result.is_err());
    assert!(out.join("good.xml").is_file());
    assert!(!out.join("bad.xml").exists());
}

#[rstest]
fn given_document_when_writing_rendered_then_creates_parent_dirs(workspace: (TempDir, PathBuf)) {
    let (temp, schema_path) = workspace;
    let values = write(temp.path(), "alice.toml", "surname = \"Smith\"\n");
    let container = ServiceContainer::new(Settings::default());
    let schema = container
        .documents
        .load_schema(&schema_path)
        .expect("load schema");
    let document = container.documents.build(&schema, &values).expect("build");
    let target = DocumentService::output_path_for(&temp.path().join("out/nested"), &values);

    container
        .documents
        .write_rendered(
            &document,
            &XmlRenderer::new(container.render_options()),
            &target,
        )
        .expect("write");

    assert_eq!(target.file_name().and_then(|n| n.to_str()), Some("alice.xml"));
    let written = fs::read_to_string(&target).expect("read output");
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Claim"));
    assert!(written.contains("<Surname>Smith</Surname>"));
}

/// Files held in memory, keyed by path.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not in memory"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn given_in_memory_files_when_building_then_output_written_through_filesystem() {
    let fs = Arc::new(
        MemoryFileSystem::default()
            .with_file("/claim.toml", SCHEMA)
            .with_file("/in/alice.toml", "surname = \"Smith\"\n"),
    );
    let container = ServiceContainer::with_deps(Settings::default(), fs.clone());
    let schema = container
        .documents
        .load_schema(Path::new("/claim.toml"))
        .expect("load schema");

    let document = container
        .documents
        .build(&schema, Path::new("/in/alice.toml"))
        .expect("build");
    let target = DocumentService::output_path_for(Path::new("/out"), Path::new("/in/alice.toml"));
    container
        .documents
        .write_rendered(
            &document,
            &XmlRenderer::new(container.render_options()),
            &target,
        )
        .expect("write");

    let written = fs.get("/out/alice.xml").expect("output written");
    assert!(written.contains("<Claimant><Surname>Smith</Surname></Claimant>"), "{written}");
}
