#[derive(Debug, Clone)]
pub enum Message {
    // === RELEASE MESSAGES ===
    Connecting(String), // endpoint
    ReleaseFound(String),
    ReleaseFetchFailed,
    ReleaseFetchFailedDetail(String), // error
    ReleaseAssetSelected { name: String, url: String },
    RetryingRequest { attempt: u32, max: u32, error: String },

    // === VERSION MESSAGES ===
    InstalledVersion(String),
    NoInstalledVersion,
    VersionUpToDate(String),
    VersionDiffers { installed: String, latest: String },
    PromptLaunchExisting(String),
    NonInteractiveReinstall,
    VersionStampWriteFailed(String),
    VersionLookupFailed(String),

    // === DOWNLOAD MESSAGES ===
    DownloadStarted(String), // url
    DownloadCompleted { path: String, bytes: u64 },
    DownloadFailed(String),
    StatusChannelClosed,

    // === PROCESS MESSAGES ===
    TerminatingInstances(String), // executable base name
    ProcessTerminated { name: String, pid: u32 },
    ProcessTerminateFailed { name: String, pid: u32 },
    ProcessesTerminated(usize),
    NoRunningInstances,

    // === EXTRACTION MESSAGES ===
    Extracting(String), // install dir
    ExtractionCompleted { files: usize, directories: usize },
    ExtractionFailed(String),

    // === SHORTCUT MESSAGES ===
    CreatingShortcuts,
    ShortcutCreated(String),
    ShortcutFailed { name: String, error: String },
    DesktopDirUnavailable,
    LauncherNotFound(String),

    // === CLEANUP & LAUNCH MESSAGES ===
    CleanupFailed(String),
    Launching(String),
    LaunchFailed(String),
    ExecutableMissing(String),

    // === RESULT MESSAGES ===
    InstallCompleted { app_name: String, version: String },
    InstallSkipped { app_name: String, version: String },
    InstallFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigLoaded(String),
    ConfigNotFound(String),
    ConfigParseError(String),

    // === CHECK COMMAND ===
    CheckUpdateAvailable,
    CheckUpToDate,
    CheckNotInstalled,
}
