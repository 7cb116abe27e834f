//! Build orchestration.
//!
//! A build is two independent passes run side by side:
//! - **Bundle** - one bundler run with the profile of the build mode
//! - **Mirror** - walk the source tree and transpile or copy stale files
//!
//! Both must succeed. Nothing is rolled back when either fails.

use crate::{
    config::ProjectConfig,
    core::{BuildError, BuildMode},
    debug, log,
    mirror::{Materializer, MirrorStats, StdFs, TargetFs, TreeRoute, mirror_tree},
    tools::{Bundler, CommandBundler, CommandTranspiler, Transpiler},
    utils::plural::plural_count,
};
use anyhow::{Context, Result};
use std::{io::IsTerminal, time::Instant};

/// What a successful build did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Whether the bundling pass ran (false when disabled)
    pub bundled: bool,
    pub mirror: MirrorStats,
}

/// Runs the bundling and mirroring passes for one project.
pub struct Builder<'a> {
    config: &'a ProjectConfig,
    mode: BuildMode,
    bundler: &'a dyn Bundler,
    transpiler: &'a dyn Transpiler,
    fs: &'a dyn TargetFs,
    show_progress: bool,
}

impl<'a> Builder<'a> {
    pub fn new(
        config: &'a ProjectConfig,
        mode: BuildMode,
        bundler: &'a dyn Bundler,
        transpiler: &'a dyn Transpiler,
        fs: &'a dyn TargetFs,
    ) -> Self {
        Self {
            config,
            mode,
            bundler,
            transpiler,
            fs,
            show_progress: false,
        }
    }

    /// Show a live `transpile(n/N) copy(n/N)` line during the mirror pass.
    pub fn progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run both passes and wait for them.
    ///
    /// Uses a dedicated pool of `build.jobs` threads when set, otherwise the
    /// global rayon pool.
    pub fn build(&self) -> Result<BuildReport> {
        let Some(jobs) = self.config.build.jobs else {
            return Ok(self.run()?);
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("kiln-worker-{i}"))
            .build()
            .context("Failed to start worker pool")?;
        debug!("build"; "using {}", plural_count(jobs, "worker"));
        Ok(pool.install(|| self.run())?)
    }

    /// Both passes always run to completion. When both fail, the error of
    /// the pass that finished first is returned.
    fn run(&self) -> Result<BuildReport, BuildError> {
        let ((bundled, bundle_done), (mirrored, mirror_done)) = rayon::join(
            || (self.bundle(), Instant::now()),
            || (self.mirror(), Instant::now()),
        );

        match (bundled, mirrored) {
            (Ok(bundled), Ok(mirror)) => Ok(BuildReport { bundled, mirror }),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(bundle), Err(mirror)) => {
                Err(if mirror_done < bundle_done { mirror } else { bundle })
            }
        }
    }

    fn bundle(&self) -> Result<bool, BuildError> {
        if !self.config.bundler.enable {
            debug!("bundle"; "disabled");
            return Ok(false);
        }

        let profile = self.config.bundler.profile(self.mode);
        debug!("bundle"; "{} profile, config {}", profile.name(), profile.config.display());

        self.bundler
            .run(&profile)
            .map_err(|e| BuildError::Bundle {
                profile: profile.name(),
                source: e.into(),
            })?;
        Ok(true)
    }

    fn mirror(&self) -> Result<MirrorStats, BuildError> {
        let build = &self.config.build;
        let route = TreeRoute::new(&build.source, &build.target);
        let materializer =
            Materializer::new(self.fs, self.transpiler, &self.config.transpiler.extensions);
        mirror_tree(&route, &materializer, self.show_progress)
    }
}

/// Build the project with the real tools and log a summary.
pub fn build_project(config: &ProjectConfig) -> Result<BuildReport> {
    let mode = config.mode();
    let started = Instant::now();
    log!("build"; "{} build of {}", mode, config.get_root().display());

    let bundler = CommandBundler::from_config(config, mode);
    let transpiler = CommandTranspiler::from_config(config, mode);
    let fs = StdFs;

    let report = Builder::new(config, mode, &bundler, &transpiler, &fs)
        .progress(std::io::stdout().is_terminal())
        .build()?;

    if report.bundled {
        log!("bundle"; "done ({} profile)", mode.name());
    }
    let stats = report.mirror;
    if stats.written() == 0 {
        log!("mirror"; "up to date ({} fresh)", plural_count(stats.skipped, "file"));
    } else {
        log!(
            "mirror";
            "{} transpiled, {} copied, {} fresh",
            plural_count(stats.transpiled, "file"),
            stats.copied,
            stats.skipped
        );
    }
    log!("build"; "finished in {:.2?}", started.elapsed());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::mirror::testing::{FakeTranspiler, RecordingFs, TRANSPILED_HEADER, set_mtime};
    use crate::tools::BundleProfile;
    use anyhow::bail;
    use parking_lot::Mutex;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records every profile it is run with.
    #[derive(Default)]
    struct FakeBundler {
        fail: bool,
        /// Blocks its worker this long, like a real bundler run
        busy: Duration,
        runs: Mutex<Vec<BundleProfile>>,
    }

    impl FakeBundler {
        fn busy(busy: Duration) -> Self {
            Self {
                busy,
                ..Default::default()
            }
        }
    }

    impl Bundler for FakeBundler {
        fn run(&self, profile: &BundleProfile) -> anyhow::Result<()> {
            self.runs.lock().push(profile.clone());
            std::thread::sleep(self.busy);
            if self.fail {
                bail!("Module not found: Error: Can't resolve './missing'");
            }
            Ok(())
        }
    }

    fn project(extra: &str) -> (TempDir, ProjectConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("app/sub")).unwrap();
        fs::write(root.join("app/index.js"), "main()").unwrap();
        fs::write(root.join("app/style.css"), "a {}").unwrap();
        set_mtime(&root.join("app/index.js"), 1_000);
        set_mtime(&root.join("app/style.css"), 1_000);
        let config = test_config(&root, extra);
        (dir, config)
    }

    fn lib(config: &ProjectConfig) -> &Path {
        &config.build.target
    }

    #[test]
    fn test_build_runs_both_passes() {
        let (_dir, config) = project("");
        let bundler = FakeBundler::default();
        let transpiler = FakeTranspiler::default();
        let fs_ = RecordingFs::default();

        let report = Builder::new(&config, BuildMode::Production, &bundler, &transpiler, &fs_)
            .build()
            .unwrap();

        assert!(report.bundled);
        assert_eq!(report.mirror.transpiled, 1);
        assert_eq!(report.mirror.copied, 1);
        assert_eq!(report.mirror.dirs, 1);

        let runs = bundler.runs.lock();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].mode, BuildMode::Production);
        assert!(runs[0].config.ends_with("build/webpack.config.prod.js"));

        assert_eq!(
            fs::read_to_string(lib(&config).join("index.js")).unwrap(),
            format!("{TRANSPILED_HEADER}main()")
        );
        assert!(lib(&config).join("sub").is_dir());
    }

    #[test]
    fn test_mode_is_explicit_not_from_config() {
        let (_dir, config) = project("[build]\nmode = \"production\"\n");
        let bundler = FakeBundler::default();

        Builder::new(
            &config,
            BuildMode::Development,
            &bundler,
            &FakeTranspiler::default(),
            &RecordingFs::default(),
        )
        .build()
        .unwrap();

        let runs = bundler.runs.lock();
        assert_eq!(runs[0].mode, BuildMode::Development);
        assert!(runs[0].config.ends_with("build/webpack.config.dev.js"));
    }

    #[test]
    fn test_disabled_bundler_is_not_run() {
        let (_dir, config) = project("[bundler]\nenable = false\n");
        let bundler = FakeBundler::default();

        let report = Builder::new(
            &config,
            BuildMode::Development,
            &bundler,
            &FakeTranspiler::default(),
            &RecordingFs::default(),
        )
        .build()
        .unwrap();

        assert!(!report.bundled);
        assert!(bundler.runs.lock().is_empty());
        assert_eq!(report.mirror.written(), 2);
    }

    #[test]
    fn test_bundler_failure_fails_build_but_mirror_completes() {
        let (_dir, config) = project("");
        let bundler = FakeBundler {
            fail: true,
            ..Default::default()
        };

        let err = Builder::new(
            &config,
            BuildMode::Production,
            &bundler,
            &FakeTranspiler::default(),
            &RecordingFs::default(),
        )
        .build()
        .unwrap_err();

        let build_err = err.downcast_ref::<BuildError>().unwrap();
        assert!(matches!(build_err, BuildError::Bundle { profile: "production", .. }));
        // No rollback of the other pass
        assert!(lib(&config).join("style.css").is_file());
    }

    #[test]
    fn test_transpile_failure_fails_build() {
        let (_dir, config) = project("");
        let transpiler = FakeTranspiler::rejecting(&["index.js"]);

        let err = Builder::new(
            &config,
            BuildMode::Development,
            &FakeBundler::default(),
            &transpiler,
            &RecordingFs::default(),
        )
        .build()
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::Transpile(..))
        ));
    }

    #[test]
    fn test_single_worker_pool_builds() {
        let (_dir, config) = project("[build]\njobs = 1\n");
        let bundler = FakeBundler::default();

        let report = Builder::new(
            &config,
            BuildMode::Development,
            &bundler,
            &FakeTranspiler::default(),
            &RecordingFs::default(),
        )
        .build()
        .unwrap();

        assert!(report.bundled);
        assert_eq!(report.mirror.written(), 2);
        assert!(lib(&config).join("index.js").is_file());
    }

    #[test]
    fn test_long_bundler_run_does_not_starve_mirror() {
        let (_dir, config) = project("[build]\njobs = 2\n");
        let bundler = FakeBundler::busy(Duration::from_millis(1500));

        let report = Builder::new(
            &config,
            BuildMode::Production,
            &bundler,
            &FakeTranspiler::default(),
            &RecordingFs::default(),
        )
        .build()
        .unwrap();

        assert!(report.bundled);
        assert_eq!(report.mirror.transpiled, 1);
        assert_eq!(report.mirror.copied, 1);
    }

    #[test]
    fn test_earliest_failure_is_reported() {
        let (_dir, config) = project("[build]\njobs = 2\n");
        let bundler = FakeBundler {
            fail: true,
            busy: Duration::from_millis(500),
            ..Default::default()
        };

        let err = Builder::new(
            &config,
            BuildMode::Production,
            &bundler,
            &FakeTranspiler::rejecting(&["index.js"]),
            &RecordingFs::default(),
        )
        .build()
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::Transpile(..))
        ));
        // The slower pass still ran
        assert_eq!(bundler.runs.lock().len(), 1);
    }

    #[test]
    fn test_dedicated_pool_and_rebuild_is_noop() {
        let (_dir, config) = project("[build]\njobs = 2\n");
        let transpiler = FakeTranspiler::default();
        let fs_ = RecordingFs::default();
        let bundler = FakeBundler::default();
        let builder = Builder::new(&config, BuildMode::Development, &bundler, &transpiler, &fs_);

        builder.build().unwrap();
        fs_.clear();
        let report = builder.build().unwrap();

        assert_eq!(fs_.file_writes(), 0);
        assert_eq!(report.mirror.skipped, 2);
        assert_eq!(transpiler.calls(), 1);
    }
}
