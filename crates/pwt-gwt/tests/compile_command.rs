use pwt_core::lazy_evaluation::Prop;
use pwt_core::{Project, Task};
use pwt_gwt::compile::{GwtCompile, COMPILE_FAILED};
use pwt_gwt::flags::TOGGLES;
use pwt_gwt::options::{CodeStyle, CompilerOptions};
use pwt_gwt::{GwtPlugin, PutnamiExtension};
use pwt_std::runner::{ProcessRunner, RunningProcess};
use pwt_std::specs::exec_spec::ExecSpec;
use pwt_std::specs::java_spec::CLASS_PATH_SEPARATOR;
use pwt_std::ExecError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Records launched specs and reports a fixed exit code
#[derive(Clone, Default)]
struct ScriptedRunner {
    exit_code: i32,
    launched: Arc<Mutex<Vec<(ExecSpec, PathBuf)>>>,
}

impl ScriptedRunner {
    fn exiting_with(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Default::default()
        }
    }

    fn args(&self) -> Vec<String> {
        let launched = self.launched.lock().unwrap();
        let (spec, _) = launched.last().expect("nothing was launched");
        spec.args()
            .iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn execute(
        &self,
        spec: ExecSpec,
        working_dir: &Path,
    ) -> Result<Box<dyn RunningProcess>, ExecError> {
        self.launched
            .lock()
            .unwrap()
            .push((spec, working_dir.to_path_buf()));
        Ok(Box::new(ScriptedProcess {
            code: self.exit_code,
            joined: false,
        }))
    }
}

struct ScriptedProcess {
    code: i32,
    joined: bool,
}

impl RunningProcess for ScriptedProcess {
    fn join(&mut self) -> Result<i32, ExecError> {
        self.joined = true;
        Ok(self.code)
    }

    fn exit_value(&mut self) -> Result<i32, ExecError> {
        if self.joined {
            Ok(self.code)
        } else {
            Err(ExecError::InvalidState("process has not terminated"))
        }
    }
}

struct FailingRunner;

impl ProcessRunner for FailingRunner {
    fn execute(
        &self,
        spec: ExecSpec,
        _working_dir: &Path,
    ) -> Result<Box<dyn RunningProcess>, ExecError> {
        Err(ExecError::LaunchFailure {
            executable: spec.executable().to_os_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    }
}

fn gwt_project() -> Project {
    let mut project = Project::temp("gwt").unwrap();
    project.apply_plugin::<GwtPlugin>().unwrap();
    let extension = project.require_extension_mut::<PutnamiExtension>().unwrap();
    extension.modules.push("com.example.App");
    extension.compile.local_workers.set(4_usize).unwrap();
    project
}

fn compile_task(project: &Project, runner: &ScriptedRunner) -> GwtCompile {
    let mut task = GwtCompile::create(project).unwrap().with_runner(runner.clone());
    task.java_executable.set("/usr/bin/java").unwrap();
    task
}

fn run_with_options<F: FnOnce(&mut CompilerOptions)>(configure: F) -> Vec<String> {
    let project = gwt_project();
    let runner = ScriptedRunner::exiting_with(0);
    let mut task = compile_task(&project, &runner);
    configure(&mut task.options);
    task.task_action(&project).unwrap();
    runner.args()
}

fn toggle_prop<'a>(options: &'a mut CompilerOptions, name: &str) -> &'a mut Prop<bool> {
    match name {
        "fail_on_error" => &mut options.fail_on_error,
        "draft_compile" => &mut options.draft_compile,
        "compile_report" => &mut options.compile_report,
        "incremental" => &mut options.incremental,
        "check_assertions" => &mut options.check_assertions,
        "check_casts" => &mut options.check_casts,
        "enforce_strict_resources" => &mut options.enforce_strict_resources,
        "class_metadata" => &mut options.class_metadata,
        "overlapping_source_warnings" => &mut options.overlapping_source_warnings,
        "save_source" => &mut options.save_source,
        "closure_compiler" => &mut options.closure_compiler,
        other => panic!("no option named {}", other),
    }
}

#[test]
fn end_to_end_ordering() {
    let mut project = gwt_project();
    let out = project.project_dir().join("out");
    let work = project.project_dir().join("work");
    {
        let extension = project.require_extension_mut::<PutnamiExtension>().unwrap();
        extension.compile.war.set(out.clone()).unwrap();
        extension.compile.work_dir.set(work.clone()).unwrap();
        extension.compile.set_optimize(9).unwrap();
        extension.compile.style.set(CodeStyle::Obfuscated).unwrap();
        extension.compile.fail_on_error.set(true).unwrap();
        extension.compile.incremental.set(false).unwrap();
    }

    {
        let runner = ScriptedRunner::exiting_with(0);
        let mut task = compile_task(&project, &runner);
        task.task_action(&project).unwrap();

        let putnami = project.build_dir().fallible_get().unwrap().join("putnami");
        let path = |p: PathBuf| p.to_string_lossy().to_string();
        let class_path = ["src/main/java", "src/main/resources"].join(CLASS_PATH_SEPARATOR);
        let expected: Vec<String> = vec![
            "-Dgwt.persistentunitcache=false".to_string(),
            "-cp".to_string(),
            class_path,
            "com.google.gwt.dev.Compiler".to_string(),
            "-workDir".to_string(),
            path(work),
            "-gen".to_string(),
            path(putnami.join("extra/gen")),
            "-war".to_string(),
            path(out.clone()),
            "-deploy".to_string(),
            path(putnami.join("extra/deploy")),
            "-extra".to_string(),
            path(putnami.join("extra")),
            "-logLevel".to_string(),
            "INFO".to_string(),
            "-localWorkers".to_string(),
            "4".to_string(),
            "-failOnError".to_string(),
            "-nodraftCompile".to_string(),
            "-optimize".to_string(),
            "9".to_string(),
            "-style".to_string(),
            "OBFUSCATED".to_string(),
            "-nocompileReport".to_string(),
            "-nocheckAssertions".to_string(),
            "-XcheckCasts".to_string(),
            "-XnoenforceStrictResources".to_string(),
            "-XclassMetadata".to_string(),
            "-nooverlappingSourceWarnings".to_string(),
            "-nosaveSource".to_string(),
            "-XmethodNameDisplayMode".to_string(),
            "NONE".to_string(),
            "-XnoclosureCompiler".to_string(),
            "-XjsInteropMode".to_string(),
            "NONE".to_string(),
            "com.example.App".to_string(),
        ];
        assert_eq!(runner.args(), expected);
        assert!(!runner.args().iter().any(|t| t == "-incremental"));

        let launched = runner.launched.lock().unwrap();
        let (spec, working_dir) = &launched[0];
        assert_eq!(spec.executable(), "/usr/bin/java");
        assert_eq!(working_dir, &project.project_dir());
        assert!(out.is_dir(), "output directories are created before compiling");
    }
}

#[test]
fn paired_toggles_emit_exactly_one_token() {
    for (name, flag) in TOGGLES {
        let enabled = run_with_options(|options| toggle_prop(options, name).set(true).unwrap());
        let disabled = run_with_options(|options| toggle_prop(options, name).set(false).unwrap());

        assert_eq!(
            enabled.iter().filter(|t| *t == flag.on).count(),
            1,
            "{} enabled",
            name
        );
        assert!(!disabled.iter().any(|t| t == flag.on), "{} disabled", name);
        match flag.off {
            Some(off) => {
                assert!(!enabled.iter().any(|t| t == off), "{} enabled", name);
                assert_eq!(
                    disabled.iter().filter(|t| *t == off).count(),
                    1,
                    "{} disabled",
                    name
                );
            }
            None => assert_eq!(enabled.len(), disabled.len() + 1),
        }
    }
}

#[test]
fn incremental_only_when_enabled() {
    let enabled = run_with_options(|options| options.incremental.set(true).unwrap());
    let report = enabled.iter().position(|t| t == "-nocompileReport").unwrap();
    assert_eq!(enabled[report + 1], "-incremental");
    assert_eq!(enabled[report + 2], "-nocheckAssertions");

    let disabled = run_with_options(|_| {});
    assert!(!disabled.iter().any(|t| t.starts_with("-incremental")));
}

#[test]
fn modules_trail_in_order() {
    let project = gwt_project();
    let runner = ScriptedRunner::exiting_with(0);
    let mut task = compile_task(&project, &runner);
    task.modules.clear();
    task.modules
        .push_all(["com.b.Second", "com.a.First", "com.c.Third"]);
    task.task_action(&project).unwrap();
    let args = runner.args();
    assert_eq!(
        args[args.len() - 4..],
        ["NONE", "com.b.Second", "com.a.First", "com.c.Third"]
    );
}

#[test]
fn non_zero_exit_fails_compile() {
    for code in [1, 127, -1] {
        let project = gwt_project();
        let runner = ScriptedRunner::exiting_with(code);
        let mut task = compile_task(&project, &runner);
        let err = task.task_action(&project).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("{} (exit code {})", COMPILE_FAILED, code)
        );
    }
}

#[test]
fn zero_exit_succeeds() {
    let project = gwt_project();
    let runner = ScriptedRunner::exiting_with(0);
    let mut task = compile_task(&project, &runner);
    assert!(task.task_action(&project).is_ok());
    assert_eq!(runner.launched.lock().unwrap().len(), 1);
}

#[test]
fn launch_failure_fails_compile() {
    let project = gwt_project();
    let mut task = GwtCompile::create(&project)
        .unwrap()
        .with_runner(FailingRunner);
    let err = task.task_action(&project).unwrap_err();
    assert!(err.to_string().contains("could not launch"), "{}", err);
}

#[test]
fn exit_value_requires_termination() {
    let mut process = ScriptedRunner::exiting_with(3)
        .execute(ExecSpec::default(), Path::new("."))
        .unwrap();
    assert!(matches!(
        process.exit_value(),
        Err(ExecError::InvalidState(_))
    ));
    assert_eq!(process.join().unwrap(), 3);
    assert_eq!(process.exit_value().unwrap(), 3);
}

#[test]
fn task_values_do_not_leak_into_extension() {
    let project = gwt_project();
    let runner = ScriptedRunner::exiting_with(0);
    let mut task = compile_task(&project, &runner);
    task.options.style.set(CodeStyle::Pretty).unwrap();
    let other = GwtCompile::create(&project).unwrap();
    assert!(task.command_line(&project).unwrap().contains("PRETTY"));
    assert!(other.command_line(&project).unwrap().contains("OBFUSCATED"));
}
