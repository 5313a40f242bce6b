//! Drive the benchmark cases through their lifecycle against temporary directories.

use std::path::Path;

use fs_err as fs;
use tempfile::TempDir;

use archbench_archive::{ArchiveFormat, read_entries};
use archbench_bench::{
    BenchCase, BenchSettings, BuildFromDir, BuildFromStringWithBuffering, CaseState, Error,
    ErrorKind, SourceFile, collect_source_files,
};

const FORMATS: [ArchiveFormat; 2] = [ArchiveFormat::Zip, ArchiveFormat::TarGz];

struct Context {
    temp_dir: TempDir,
}

impl Context {
    fn new(files: &[(&str, &str)]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        fs::create_dir_all(&source).unwrap();
        for (path, contents) in files {
            let path = source.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        Self { temp_dir }
    }

    fn source_dir(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("source")
    }

    fn destination_dir(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("dist").join("build-from-dir")
    }

    fn settings(&self, format: ArchiveFormat) -> BenchSettings {
        BenchSettings {
            source_dir: self.source_dir(),
            destination_dir: self.destination_dir(),
            format,
            profiling: false,
            archive_readonly: false,
        }
    }

    /// The number of files in the destination directory.
    fn archive_count(&self) -> usize {
        fs::read_dir(self.destination_dir())
            .map(Iterator::count)
            .unwrap_or_default()
    }
}

fn entries(path: &Path, format: ArchiveFormat) -> Vec<(String, String)> {
    read_entries(path, format)
        .unwrap()
        .into_iter()
        .map(|(name, contents)| (name, String::from_utf8(contents).unwrap()))
        .collect()
}

#[test]
fn build_from_dir_single_file() {
    for format in FORMATS {
        let context = Context::new(&[("a.txt", "hello")]);
        let mut case = BuildFromDir::new(context.settings(format));

        case.setup().unwrap();
        let destination = case.destination().unwrap().to_path_buf();
        assert!(!destination.exists());

        case.bench().unwrap();
        assert_eq!(
            entries(&destination, format),
            vec![("a.txt".to_string(), "hello".to_string())]
        );

        case.teardown();
        assert!(!destination.exists());
        assert_eq!(context.archive_count(), 0);
    }
}

#[test]
fn build_from_dir_entries_match_source_tree() {
    let context = Context::new(&[
        ("a.txt", "a"),
        ("sub/b.txt", "b"),
        ("sub/deeper/c.txt", "c"),
        (".hidden", "hidden"),
    ]);
    let mut case = BuildFromDir::new(context.settings(ArchiveFormat::Zip));

    case.setup().unwrap();
    case.bench().unwrap();
    let listing = entries(case.destination().unwrap(), ArchiveFormat::Zip)
        .into_iter()
        .map(|(name, contents)| format!("{name}: {contents}"))
        .collect::<Vec<_>>()
        .join("\n");
    case.teardown();

    insta::assert_snapshot!(listing, @r"
    .hidden: hidden
    a.txt: a
    sub/b.txt: b
    sub/deeper/c.txt: c
    ");
}

#[test]
fn buffered_build_flattens_to_basenames() {
    for format in FORMATS {
        let context = Context::new(&[("a.txt", "alpha"), ("sub/b.txt", "beta")]);
        let mut case = BuildFromStringWithBuffering::new(context.settings(format));

        case.setup().unwrap();
        assert_eq!(
            case.files(),
            [
                SourceFile {
                    name: "a.txt".to_string(),
                    contents: b"alpha".to_vec(),
                },
                SourceFile {
                    name: "b.txt".to_string(),
                    contents: b"beta".to_vec(),
                },
            ]
        );

        case.bench().unwrap();
        let destination = case.destination().unwrap().to_path_buf();
        assert_eq!(
            entries(&destination, format),
            vec![
                ("a.txt".to_string(), "alpha".to_string()),
                ("b.txt".to_string(), "beta".to_string()),
            ]
        );

        case.teardown();
        assert!(!destination.exists());
        assert!(case.files().is_empty());
    }
}

#[test]
fn buffered_build_follows_discovery_order() {
    let context = Context::new(&[
        ("z.txt", "z"),
        ("a/y.txt", "y"),
        (".git/HEAD", "ref: refs/heads/main"),
        ("m.txt", "m"),
    ]);
    let settings = context.settings(ArchiveFormat::Zip);
    let discovered = collect_source_files(&settings.source_dir)
        .unwrap()
        .into_iter()
        .map(|file| file.name)
        .collect::<Vec<_>>();
    assert_eq!(discovered, ["HEAD", "y.txt", "m.txt", "z.txt"]);

    let mut case = BuildFromStringWithBuffering::new(settings);
    case.setup().unwrap();
    case.bench().unwrap();
    let names = entries(case.destination().unwrap(), ArchiveFormat::Zip)
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    case.teardown();

    assert_eq!(names, discovered);
}

#[test]
fn buffered_build_duplicate_basenames() {
    let context = Context::new(&[("one/README.md", "first"), ("two/README.md", "second")]);
    let mut case = BuildFromStringWithBuffering::new(context.settings(ArchiveFormat::Zip));

    case.setup().unwrap();
    assert_eq!(case.files().len(), 2);
    case.bench().unwrap();
    assert_eq!(
        entries(case.destination().unwrap(), ArchiveFormat::Zip),
        vec![("README.md".to_string(), "second".to_string())]
    );
    case.teardown();
}

/// On Unix, `\` is an ordinary file name character and must survive into entry names.
#[test]
#[cfg(unix)]
fn backslashes_in_file_names() {
    for format in FORMATS {
        let context = Context::new(&[
            (r"dir\file.txt", "backslash"),
            (r"..\notes.txt", "notes"),
        ]);
        let expected = vec![
            (r"..\notes.txt".to_string(), "notes".to_string()),
            (r"dir\file.txt".to_string(), "backslash".to_string()),
        ];

        let mut case = BuildFromDir::new(context.settings(format));
        case.setup().unwrap();
        case.bench().unwrap();
        assert_eq!(entries(case.destination().unwrap(), format), expected);
        case.teardown();

        let mut case = BuildFromStringWithBuffering::new(context.settings(format));
        case.setup().unwrap();
        assert_eq!(
            case.files()
                .iter()
                .map(|file| file.name.as_str())
                .collect::<Vec<_>>(),
            [r"..\notes.txt", r"dir\file.txt"]
        );
        case.bench().unwrap();
        assert_eq!(entries(case.destination().unwrap(), format), expected);
        case.teardown();
    }
}

#[test]
fn profiling_aborts_setup() {
    let context = Context::new(&[("a.txt", "hello")]);
    let settings = BenchSettings {
        profiling: true,
        ..context.settings(ArchiveFormat::Zip)
    };

    let mut cases: [Box<dyn BenchCase>; 2] = [
        Box::new(BuildFromDir::new(settings.clone())),
        Box::new(BuildFromStringWithBuffering::new(settings)),
    ];
    for case in &mut cases {
        let err = case.setup().unwrap_err();
        assert!(matches!(err, Error::ProfilingEnabled), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::Environment);

        let err = case.bench().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        case.teardown();
    }

    assert!(!context.destination_dir().exists());
}

#[test]
fn missing_source_directory() {
    let context = Context::new(&[]);
    let settings = BenchSettings {
        source_dir: context.temp_dir.path().join("missing"),
        ..context.settings(ArchiveFormat::Zip)
    };
    let mut case = BuildFromDir::new(settings);

    let err = case.setup().unwrap_err();
    assert!(matches!(err, Error::MissingSourceDirectory(_)), "{err:?}");
    assert_eq!(case.state(), CaseState::Uninitialized);
}

#[test]
fn uncreatable_destination_directory() {
    let context = Context::new(&[("a.txt", "hello")]);
    let blocker = context.temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let settings = BenchSettings {
        destination_dir: blocker.join("dest"),
        ..context.settings(ArchiveFormat::Zip)
    };
    let mut case = BuildFromStringWithBuffering::new(settings);

    let err = case.setup().unwrap_err();
    assert!(matches!(err, Error::CreateDestinationDirectory(..)), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Environment);
    assert!(case.destination().is_none());

    let err = case.bench().unwrap_err();
    assert!(
        matches!(
            err,
            Error::NotPrepared {
                state: CaseState::PreconditionsChecked,
                ..
            }
        ),
        "{err:?}"
    );
    insta::assert_snapshot!(
        err.to_string(),
        @"`build-from-string-with-buffering` is not prepared for the timed operation (state: preconditions-checked), `setup` must succeed first"
    );
    case.teardown();
    assert_eq!(case.state(), CaseState::ResourcesReleased);
}

#[test]
fn state_transitions() {
    let context = Context::new(&[("a.txt", "hello")]);
    let mut case = BuildFromDir::new(context.settings(ArchiveFormat::Zip));
    assert_eq!(case.name(), "build-from-dir");
    assert_eq!(case.state(), CaseState::Uninitialized);

    let err = case.bench().unwrap_err();
    assert!(matches!(err, Error::NotPrepared { .. }), "{err:?}");
    assert_eq!(context.archive_count(), 0);

    case.setup().unwrap();
    assert_eq!(case.state(), CaseState::ResourcesPrepared);

    case.bench().unwrap();
    assert_eq!(case.state(), CaseState::OperationComplete);

    // The timed operation runs once per setup.
    let err = case.bench().unwrap_err();
    assert!(matches!(err, Error::NotPrepared { .. }), "{err:?}");

    case.teardown();
    assert_eq!(case.state(), CaseState::ResourcesReleased);
    case.teardown();
    assert_eq!(case.state(), CaseState::ResourcesReleased);

    case.setup().unwrap();
    assert_eq!(case.state(), CaseState::ResourcesPrepared);
    case.teardown();
}

#[test]
fn failed_operation() {
    let context = Context::new(&[("a.txt", "hello")]);
    let mut case = BuildFromDir::new(context.settings(ArchiveFormat::Zip));

    case.setup().unwrap();
    // The source directory disappears between setup and the timed operation.
    fs::remove_dir_all(context.source_dir()).unwrap();

    let err = case.bench().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operation);
    assert_eq!(case.state(), CaseState::OperationFailed);

    case.teardown();
    assert_eq!(context.archive_count(), 0);
}

#[test]
fn teardown_never_fails() {
    let context = Context::new(&[("a.txt", "hello")]);
    let mut case = BuildFromDir::new(context.settings(ArchiveFormat::Zip));

    // Before setup.
    case.teardown();

    // Without running the timed operation.
    case.setup().unwrap();
    case.teardown();

    // After the archive was already removed.
    case.setup().unwrap();
    case.bench().unwrap();
    fs::remove_file(case.destination().unwrap()).unwrap();
    case.teardown();

    assert_eq!(context.archive_count(), 0);
}

#[test]
fn iterations_use_fresh_destinations() {
    let context = Context::new(&[("a.txt", "hello")]);
    let mut case = BuildFromDir::new(context.settings(ArchiveFormat::Zip));

    let mut destinations = Vec::new();
    for _ in 0..10 {
        case.setup().unwrap();
        destinations.push(case.destination().unwrap().to_path_buf());
        case.bench().unwrap();
        case.teardown();
    }
    destinations.sort();
    destinations.dedup();
    assert_eq!(destinations.len(), 10);
    assert_eq!(context.archive_count(), 0);
}

#[test]
fn setup_without_teardown_releases_previous_iteration() {
    let context = Context::new(&[("a.txt", "hello")]);
    let mut case = BuildFromDir::new(context.settings(ArchiveFormat::Zip));

    case.setup().unwrap();
    case.bench().unwrap();
    let first = case.destination().unwrap().to_path_buf();
    assert!(first.is_file());

    case.setup().unwrap();
    assert!(!first.exists());
    assert_ne!(case.destination().unwrap(), first);
    case.teardown();
}

#[test]
fn dropping_a_case_removes_its_archive() {
    let context = Context::new(&[("a.txt", "hello")]);
    let mut case = BuildFromDir::new(context.settings(ArchiveFormat::Zip));

    case.setup().unwrap();
    case.bench().unwrap();
    assert_eq!(context.archive_count(), 1);
    drop(case);
    assert_eq!(context.archive_count(), 0);
}
