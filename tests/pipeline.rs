//! End-to-end pipeline scenarios with a scripted tool runner.
//!
//! No real external tools are executed: the runner records every invocation
//! and simulates tool side effects by writing the files a successful run
//! would produce.

use fontpak::pipeline::error::Result;
use fontpak::pipeline::runner::{ToolOutput, ToolRunner};
use fontpak::pipeline::{Config, Pipeline, PipelineEvent, RunOptions, Stage, exit_code, worker};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Hook = dyn Fn(&Path, &[String]) -> ToolOutput + Send + Sync;

/// Records invocations and delegates behavior to a scripted hook.
#[derive(Clone)]
struct ScriptedRunner {
    calls: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
    hook: Arc<Hook>,
}

impl ScriptedRunner {
    fn new<F>(hook: F) -> Self
    where
        F: Fn(&Path, &[String]) -> ToolOutput + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            hook: Arc::new(hook),
        }
    }

    fn exit_zero() -> Self {
        Self::new(|_: &Path, _: &[String]| ok_output())
    }

    fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(program, _)| program.display().to_string())
            .collect()
    }

    fn invoked(&self, tool: &str) -> bool {
        self.programs().iter().any(|p| p.contains(tool))
    }
}

impl ToolRunner for ScriptedRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<ToolOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));
        Ok((self.hook)(program, args))
    }
}

fn ok_output() -> ToolOutput {
    ToolOutput {
        code: Some(0),
        stdout: String::new(),
        stderr: String::new(),
    }
}

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}

/// Lays down the extraction tool and a source archive under `root`.
fn provision_extractor(config: &Config, root: &Path) -> PathBuf {
    touch(&config.extractor_exe());
    let archive = root.join("res.pak");
    std::fs::write(&archive, b"pak").unwrap();
    archive
}

/// Lays down the rasterizer, the font-metadata generator, and one typeface.
fn provision_font_tools(config: &Config, with_typeface: bool) {
    touch(&config.fontgen_exe());
    touch(&config.rasterizer_exe());
    std::fs::create_dir_all(config.typeface_dir()).unwrap();
    if with_typeface {
        touch(&config.typeface_dir().join("ChironHeiHK-Text-R-400.ttf"));
    }
}

/// Lays down the repack tool, its script, and the destination archive.
fn provision_repacker(config: &Config) {
    touch(&config.repacker_exe());
    touch(&config.repack_script());
    std::fs::write(config.assets_archive(), b"assets").unwrap();
}

/// Hook behavior: extraction writes both localization files, the rasterizer
/// writes the artifacts listed in `rasterizer_artifacts`.
fn scripted_tools(config: &Config, rasterizer_artifacts: &'static [&'static str]) -> ScriptedRunner {
    let extracted_lang = config.extracted_res_dir().join("lang");
    let fonts_dir = config.modded_fonts_dir();
    ScriptedRunner::new(move |program: &Path, _args: &[String]| {
        let name = program.file_name().unwrap().to_string_lossy().into_owned();
        if name == "quickbms.exe" {
            std::fs::create_dir_all(&extracted_lang).unwrap();
            std::fs::write(extracted_lang.join("texts_zh.xml"), b"<texts/>").unwrap();
            std::fs::write(extracted_lang.join("export_zh.xml"), b"<export/>").unwrap();
        } else if name == "txt2fnt.exe" {
            std::fs::create_dir_all(&fonts_dir).unwrap();
            for artifact in rasterizer_artifacts {
                std::fs::write(fonts_dir.join(artifact), b"bin").unwrap();
            }
        }
        ok_output()
    })
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut map = BTreeMap::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            map.insert(
                entry.file_name().to_string_lossy().into_owned(),
                std::fs::read(entry.path()).unwrap(),
            );
        }
    }
    map
}

/// Scenario A: successful extraction with `extract-only` set exits zero
/// without ever invoking the rasterizer.
#[tokio::test]
async fn extract_only_short_circuits_before_font_tools() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());

    let runner = scripted_tools(&config, &[]);
    let pipeline = Pipeline::new(config.clone(), runner.clone());
    let opts = RunOptions {
        archive,
        extract_only: true,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::SUCCESS);
    assert!(runner.invoked("quickbms.exe"));
    assert!(!runner.invoked("txt2fnt.exe"));

    let staged = config.extracted_txt_dir();
    assert!(staged.join("texts_zh.xml").exists());
    assert!(staged.join("export_zh.xml").exists());
}

/// Scenario B: without `extract-only`, an empty typeface directory halts the
/// run at the font-tool prerequisite check.
#[tokio::test]
async fn empty_typeface_dir_halts_with_font_tool_code() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());
    provision_font_tools(&config, false);

    let runner = scripted_tools(&config, &[]);
    let pipeline = Pipeline::new(config.clone(), runner.clone());
    let opts = RunOptions {
        archive,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::MISSING_FONT_TOOLS);
    assert!(!runner.invoked("txt2fnt.exe"));
}

/// Scenario C: injection with only the export file stages one file, invokes
/// the tool, and reports success.
#[tokio::test]
async fn injection_with_one_file_succeeds() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());
    touch(&config.extract_script());

    let xml_dir = root.path().join("edited-xml");
    std::fs::create_dir_all(&xml_dir).unwrap();
    std::fs::write(xml_dir.join("export_zh.xml"), b"<export/>").unwrap();

    let runner = ScriptedRunner::exit_zero();
    let pipeline = Pipeline::new(config.clone(), runner.clone());
    let opts = RunOptions {
        archive,
        inject_xml_dir: Some(xml_dir),
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::SUCCESS);
    assert_eq!(runner.calls.lock().unwrap().len(), 1);

    let staged = config.inject_staging_dir().join("lang");
    assert!(staged.join("export_zh.xml").exists());
    assert!(!staged.join("texts_zh.xml").exists());
}

/// With `continue_after_inject`, a successful injection flows into the
/// forward pipeline: the extraction tool runs a second time, now in
/// extract mode.
#[tokio::test]
async fn successful_injection_continues_into_forward_pipeline() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());
    touch(&config.extract_script());

    let xml_dir = root.path().join("edited-xml");
    std::fs::create_dir_all(&xml_dir).unwrap();
    std::fs::write(xml_dir.join("export_zh.xml"), b"<export/>").unwrap();

    let runner = scripted_tools(&config, &[]);
    let pipeline = Pipeline::new(config.clone(), runner.clone());
    let opts = RunOptions {
        archive,
        inject_xml_dir: Some(xml_dir),
        continue_after_inject: true,
        extract_only: true,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::SUCCESS);

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 2, "reimport first, then extraction");
    assert!(calls[0].0.ends_with("quickbms.exe"));
    assert_eq!(&calls[0].1[0..3], &["-w", "-r", "-r"]);
    assert!(calls[1].0.ends_with("quickbms.exe"));
    assert!(calls[1].1.contains(&"-f".to_string()));
    drop(calls);

    // The forward pipeline really ran: extraction output was staged.
    assert!(config.extracted_txt_dir().join("texts_zh.xml").exists());
}

/// A failed injection halts the run with the injection exit code even when
/// `continue_after_inject` is set; the forward pipeline is never entered.
#[tokio::test]
async fn failed_injection_does_not_enter_forward_pipeline() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());
    touch(&config.extract_script());

    let xml_dir = root.path().join("edited-xml");
    std::fs::create_dir_all(&xml_dir).unwrap();
    std::fs::write(xml_dir.join("export_zh.xml"), b"<export/>").unwrap();

    let runner = ScriptedRunner::new(|_: &Path, _: &[String]| ToolOutput {
        code: Some(1),
        stdout: String::new(),
        stderr: String::new(),
    });
    let pipeline = Pipeline::new(config.clone(), runner.clone());
    let opts = RunOptions {
        archive,
        inject_xml_dir: Some(xml_dir),
        continue_after_inject: true,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::INJECT_FAILED);
    assert_eq!(
        runner.calls.lock().unwrap().len(),
        1,
        "only the reimport invocation, no re-extraction"
    );
}

/// A rasterizer that exits zero but produces only the bitmap must fail
/// verification; the repack tool is never reached.
#[tokio::test]
async fn missing_metrics_artifact_fails_verification() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());
    provision_font_tools(&config, true);
    provision_repacker(&config);

    let runner = scripted_tools(&config, &["noto_sans_cjk_regular.png"]);
    let pipeline = Pipeline::new(config.clone(), runner.clone());
    let opts = RunOptions {
        archive,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::FONT_GENERATION_FAILED);
    assert!(runner.invoked("txt2fnt.exe"));
    assert!(!runner.invoked("quickbms_4gb_files.exe"));
}

/// Full forward pipeline: extract, stage, generate, verify, repack.
#[tokio::test]
async fn forward_pipeline_runs_every_stage_in_order() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());
    provision_font_tools(&config, true);
    provision_repacker(&config);

    let runner = scripted_tools(
        &config,
        &["noto_sans_cjk_regular.fnt", "noto_sans_cjk_regular.png"],
    );
    let pipeline = Pipeline::new(config.clone(), runner.clone());
    let opts = RunOptions {
        archive,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::SUCCESS);

    let programs = runner.programs();
    assert_eq!(programs.len(), 3);
    assert!(programs[0].contains("quickbms.exe"));
    assert!(programs[1].contains("txt2fnt.exe"));
    assert!(programs[2].contains("quickbms_4gb_files.exe"));
}

/// Two consecutive runs against the same workspace root produce
/// byte-identical staged-input directories.
#[tokio::test]
async fn staging_is_idempotent_across_runs() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());

    let runner = scripted_tools(&config, &[]);
    let pipeline = Pipeline::new(config.clone(), runner);
    let opts = RunOptions {
        archive,
        extract_only: true,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::SUCCESS);
    let first = snapshot(&config.extracted_txt_dir());

    assert_eq!(pipeline.run(&opts).await, exit_code::SUCCESS);
    let second = snapshot(&config.extracted_txt_dir());

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

/// An invalid language token fails before any subprocess is spawned.
#[tokio::test]
async fn invalid_language_spawns_no_tools() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());

    let runner = ScriptedRunner::exit_zero();
    let pipeline = Pipeline::new(config, runner.clone());
    let opts = RunOptions {
        language: "zh;evil".to_string(),
        archive,
        ..RunOptions::default()
    };

    assert_eq!(pipeline.run(&opts).await, exit_code::EXTRACT_FAILED);
    assert!(runner.calls.lock().unwrap().is_empty());
}

/// The worker boundary reports stage progress and the final exit code over
/// its channel.
#[tokio::test]
async fn worker_streams_progress_events() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new(root.path());
    let archive = provision_extractor(&config, root.path());

    let runner = scripted_tools(&config, &[]);
    let opts = RunOptions {
        archive,
        extract_only: true,
        ..RunOptions::default()
    };

    let mut handle = worker::spawn(config, runner, opts);

    let mut stages = Vec::new();
    let mut finished = None;
    while let Some(event) = handle.events.recv().await {
        match event {
            PipelineEvent::StageStarted { stage } => stages.push(stage),
            PipelineEvent::Finished { exit_code } => finished = Some(exit_code),
        }
    }

    assert_eq!(
        stages,
        vec![Stage::PrereqExtract, Stage::Extract, Stage::Flatten]
    );
    assert_eq!(finished, Some(exit_code::SUCCESS));
    assert_eq!(handle.task.await.unwrap(), exit_code::SUCCESS);
}
