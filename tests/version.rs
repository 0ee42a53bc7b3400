#[cfg(test)]
mod tests {
    use std::fs;
    use techatlas_setup::libs::paths::InstallPaths;
    use techatlas_setup::libs::version::{installed_version, is_up_to_date, VersionStamp, VERSION_STAMP_FILE};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct VersionContext {
        _temp_dir: TempDir,
        paths: InstallPaths,
    }

    impl TestContext for VersionContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let install_dir = temp_dir.path().join("TechAtlas");
            fs::create_dir_all(&install_dir).unwrap();
            let paths = InstallPaths::new(install_dir, temp_dir.path().join("techatlas.zip"), "techatlas.exe");
            VersionContext {
                _temp_dir: temp_dir,
                paths,
            }
        }
    }

    #[test_context(VersionContext)]
    #[test]
    fn no_executable_means_no_version(ctx: &mut VersionContext) {
        // A stamp alone does not make an installation.
        VersionStamp::new("v1.0.0").write(&ctx.paths.install_dir).unwrap();

        let installed = installed_version(&ctx.paths);

        assert_eq!(installed, None);
        for remote in ["v1.0.0", "1.0.0", "", "v9"] {
            assert!(!is_up_to_date(remote, installed.as_deref()));
        }
    }

    #[test_context(VersionContext)]
    #[test]
    fn stamp_supplies_version_of_existing_install(ctx: &mut VersionContext) {
        fs::write(ctx.paths.executable_path(), b"binary").unwrap();
        VersionStamp::new("1.0.0").write(&ctx.paths.install_dir).unwrap();

        let installed = installed_version(&ctx.paths);

        assert_eq!(installed.as_deref(), Some("1.0.0"));
        assert!(is_up_to_date("v1.0.0", installed.as_deref()));
    }

    #[test_context(VersionContext)]
    #[test]
    fn executable_without_metadata_is_unknown_version(ctx: &mut VersionContext) {
        fs::write(ctx.paths.executable_path(), b"binary").unwrap();

        assert_eq!(installed_version(&ctx.paths), None);
    }

    #[test_context(VersionContext)]
    #[test]
    fn corrupt_stamp_is_ignored(ctx: &mut VersionContext) {
        fs::write(ctx.paths.executable_path(), b"binary").unwrap();
        fs::write(ctx.paths.install_dir.join(VERSION_STAMP_FILE), "not json").unwrap();

        assert_eq!(installed_version(&ctx.paths), None);
    }

    #[test_context(VersionContext)]
    #[test]
    fn stamp_round_trips(ctx: &mut VersionContext) {
        let stamp = VersionStamp::new("v2.3.0");
        stamp.write(&ctx.paths.install_dir).unwrap();

        assert_eq!(VersionStamp::read(&ctx.paths.install_dir), Some(stamp));
    }
}
