#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use techatlas_setup::libs::archive::extract;
    use techatlas_setup::libs::error::InstallError;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    enum Entry<'a> {
        Dir(&'a str),
        File(&'a str, &'a [u8]),
    }

    /// A scratch directory holding the archive and the extraction target.
    struct ArchiveContext {
        temp_dir: TempDir,
    }

    impl TestContext for ArchiveContext {
        fn setup() -> Self {
            ArchiveContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl ArchiveContext {
        fn target(&self) -> PathBuf {
            self.temp_dir.path().join("TechAtlas")
        }

        fn archive(&self, name: &str, entries: &[Entry]) -> PathBuf {
            let path = self.temp_dir.path().join(name);
            let mut writer = ZipWriter::new(File::create(&path).unwrap());
            let options = SimpleFileOptions::default();
            for entry in entries {
                match entry {
                    Entry::Dir(name) => writer.add_directory(*name, options).unwrap(),
                    Entry::File(name, content) => {
                        writer.start_file(*name, options).unwrap();
                        writer.write_all(content).unwrap();
                    }
                }
            }
            writer.finish().unwrap();
            path
        }
    }

    fn read(path: &Path) -> Vec<u8> {
        fs::read(path).unwrap()
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn extracts_nested_tree(ctx: &mut ArchiveContext) {
        let archive = ctx.archive(
            "app.zip",
            &[
                Entry::Dir("assets/"),
                Entry::File("techatlas.exe", b"binary"),
                Entry::File("assets/maps/world.json", b"{}"),
                Entry::File("TechPen.bat", b"@echo off"),
            ],
        );

        let summary = extract(&archive, &ctx.target()).unwrap();

        assert_eq!(summary.files, 3);
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.bytes, (6 + 2 + 9) as u64);
        assert_eq!(read(&ctx.target().join("techatlas.exe")), b"binary");
        assert_eq!(read(&ctx.target().join("assets/maps/world.json")), b"{}");
        assert!(ctx.target().join("assets").is_dir());
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn second_extraction_is_identical(ctx: &mut ArchiveContext) {
        let archive = ctx.archive(
            "app.zip",
            &[Entry::File("techatlas.exe", b"v2"), Entry::Dir("data/"), Entry::File("data/a.txt", b"alpha")],
        );

        let first = extract(&archive, &ctx.target()).unwrap();
        let exe_after_first = read(&ctx.target().join("techatlas.exe"));
        let second = extract(&archive, &ctx.target()).unwrap();

        assert_eq!(first, second);
        assert_eq!(read(&ctx.target().join("techatlas.exe")), exe_after_first);
        assert_eq!(read(&ctx.target().join("data/a.txt")), b"alpha");
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn overwrites_existing_files(ctx: &mut ArchiveContext) {
        fs::create_dir_all(ctx.target()).unwrap();
        fs::write(ctx.target().join("techatlas.exe"), b"old and much longer content").unwrap();
        fs::write(ctx.target().join("user-notes.txt"), b"keep me").unwrap();
        let archive = ctx.archive("app.zip", &[Entry::File("techatlas.exe", b"new")]);

        extract(&archive, &ctx.target()).unwrap();

        assert_eq!(read(&ctx.target().join("techatlas.exe")), b"new");
        assert_eq!(read(&ctx.target().join("user-notes.txt")), b"keep me");
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn traversal_entry_fails_before_anything_is_written(ctx: &mut ArchiveContext) {
        let archive = ctx.archive(
            "evil.zip",
            &[Entry::File("good.txt", b"fine"), Entry::File("../evil.txt", b"pwned")],
        );

        let result = extract(&archive, &ctx.target());

        assert!(matches!(result, Err(InstallError::PathTraversal(name)) if name == "../evil.txt"));
        assert!(!ctx.temp_dir.path().join("evil.txt").exists());
        assert!(!ctx.target().join("good.txt").exists());
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn backslash_traversal_is_rejected(ctx: &mut ArchiveContext) {
        let archive = ctx.archive("evil.zip", &[Entry::File("sub\\..\\..\\evil.txt", b"pwned")]);

        let result = extract(&archive, &ctx.target());

        assert!(matches!(result, Err(InstallError::PathTraversal(_))));
        assert!(!ctx.temp_dir.path().join("evil.txt").exists());
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn file_over_existing_directory_is_io_error(ctx: &mut ArchiveContext) {
        fs::create_dir_all(ctx.target().join("techatlas.exe")).unwrap();
        let archive = ctx.archive("app.zip", &[Entry::File("techatlas.exe", b"binary")]);

        let result = extract(&archive, &ctx.target());

        assert!(matches!(result, Err(InstallError::Io { .. })));
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn directory_over_existing_file_is_io_error(ctx: &mut ArchiveContext) {
        fs::create_dir_all(ctx.target()).unwrap();
        fs::write(ctx.target().join("assets"), b"not a dir").unwrap();
        let archive = ctx.archive("app.zip", &[Entry::Dir("assets/"), Entry::File("assets/logo.png", b"png")]);

        let result = extract(&archive, &ctx.target());

        assert!(matches!(result, Err(InstallError::Io { .. })));
    }

    #[test_context(ArchiveContext)]
    #[test]
    fn corrupt_archive_is_reported(ctx: &mut ArchiveContext) {
        let archive = ctx.temp_dir.path().join("broken.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let result = extract(&archive, &ctx.target());

        assert!(matches!(result, Err(InstallError::Archive(_)) | Err(InstallError::Io { .. })));
    }

    #[cfg(unix)]
    #[test_context(ArchiveContext)]
    #[test]
    fn symlinked_directory_cannot_redirect_writes(ctx: &mut ArchiveContext) {
        let outside = ctx.temp_dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::create_dir_all(ctx.target()).unwrap();
        std::os::unix::fs::symlink(&outside, ctx.target().join("data")).unwrap();
        let archive = ctx.archive(
            "app.zip",
            &[
                Entry::File("data/payload.txt", b"pwned"),
                Entry::File("data/sub/deeper/payload.txt", b"pwned"),
            ],
        );

        let result = extract(&archive, &ctx.target());

        assert!(matches!(result, Err(InstallError::PathTraversal(_))));
        assert!(!outside.join("payload.txt").exists());
        assert!(fs::read_dir(&outside).unwrap().next().is_none());
    }

    #[cfg(unix)]
    #[test_context(ArchiveContext)]
    #[test]
    fn symlinked_directory_gets_no_new_subdirectories(ctx: &mut ArchiveContext) {
        let outside = ctx.temp_dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::create_dir_all(ctx.target()).unwrap();
        std::os::unix::fs::symlink(&outside, ctx.target().join("data")).unwrap();
        let archive = ctx.archive(
            "app.zip",
            &[Entry::Dir("data/sub/"), Entry::File("data/sub/deeper/payload.txt", b"pwned")],
        );

        let result = extract(&archive, &ctx.target());

        assert!(matches!(result, Err(InstallError::PathTraversal(name)) if name == "data/sub/"));
        assert!(!outside.join("sub").exists());
    }

    #[cfg(unix)]
    #[test_context(ArchiveContext)]
    #[test]
    fn read_only_entries_extract_again(ctx: &mut ArchiveContext) {
        use std::os::unix::fs::PermissionsExt;

        let path = ctx.temp_dir.path().join("app.zip");
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        writer
            .start_file("readme.txt", SimpleFileOptions::default().unix_permissions(0o444))
            .unwrap();
        writer.write_all(b"read me").unwrap();
        writer.finish().unwrap();

        let first = extract(&path, &ctx.target()).unwrap();
        let second = extract(&path, &ctx.target()).unwrap();

        assert_eq!(first, second);
        let readme = ctx.target().join("readme.txt");
        assert_eq!(read(&readme), b"read me");
        let mode = fs::metadata(&readme).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o444);
    }

    #[cfg(unix)]
    #[test_context(ArchiveContext)]
    #[test]
    fn unix_permissions_are_restored(ctx: &mut ArchiveContext) {
        use std::os::unix::fs::PermissionsExt;

        let path = ctx.temp_dir.path().join("app.zip");
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        writer
            .start_file("techatlas", SimpleFileOptions::default().unix_permissions(0o755))
            .unwrap();
        writer.write_all(b"#!/bin/sh\n").unwrap();
        writer.finish().unwrap();

        extract(&path, &ctx.target()).unwrap();

        let mode = fs::metadata(ctx.target().join("techatlas")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
