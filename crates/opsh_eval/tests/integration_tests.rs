use std::{
    fs,
    path::Path,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use mockall::mock;
use opsh_core::{
    command::{Action, Args, Command, CommandResult},
    Context, FileDescriptorError, Host,
};
use opsh_eval::{execute_pipeline, EvalError, EvalResult, Flow, Reaper, CONTINUE};
use opsh_parse::parse;
use parking_lot::Mutex;
use tempfile::TempDir;

mock! {
    TestHost {}
    impl Host for TestHost {
        fn println(&mut self, text: &str);
        fn eprintln(&mut self, text: &str);
        fn set_prompt(&mut self, prompt: &str);
        fn redisplay_prompt(&mut self);
    }
}

/// A host that records everything that is printed to it.
#[derive(Default)]
struct RecordingHost {
    stdout: Vec<String>,
    prompts: usize,
}

impl Host for RecordingHost {
    fn println(&mut self, text: &str) {
        self.stdout.push(text.to_owned());
    }

    fn eprintln(&mut self, _text: &str) {}

    fn set_prompt(&mut self, _prompt: &str) {}

    fn redisplay_prompt(&mut self) {
        self.prompts += 1;
    }
}

#[derive(Clone)]
struct QuitCommand;
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "quit"
    }

    fn run(&self, _: Args) -> CommandResult {
        CommandResult::with_actions(0, vec![Action::Exit(0)])
    }
}

/// Constructs a context in a directory, along with a handle to its host.
fn context_in(dir: &Path) -> (Context, Arc<Mutex<RecordingHost>>) {
    let host = Arc::new(Mutex::new(RecordingHost::default()));
    let context = Context::with_host(host.clone(), dir.to_path_buf());
    (context, host)
}

fn execute(line: &str, context: &mut Context) -> EvalResult<Flow> {
    execute_pipeline(&parse(line).expect("valid line"), context)
}

/// Reaps jobs until at least one has been reaped, or a timeout is reached.
fn reap_within(reaper: &Reaper, timeout: Duration) -> usize {
    let start = Instant::now();
    loop {
        let reaped = reaper.reap();
        if reaped > 0 || start.elapsed() > timeout {
            return reaped;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn it_waits_for_foreground_commands() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, host) = context_in(dir.path());

    let start = Instant::now();
    let flow = execute("sleep 0.2", &mut context)?;

    assert!(start.elapsed() >= Duration::from_millis(200));
    assert_eq!(flow, Flow::Continue);
    assert_eq!(flow.status(), CONTINUE);
    assert!(context.jobs.lock().is_empty());
    assert!(host.lock().stdout.is_empty());
    Ok(())
}

#[test]
fn it_continues_after_failing_commands() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());

    assert_eq!(execute("false", &mut context)?, Flow::Continue);
    Ok(())
}

#[test]
fn it_treats_blank_lines_as_no_ops() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, host) = context_in(dir.path());

    assert_eq!(execute("   ", &mut context)?, Flow::Continue);
    assert_eq!(execute("> ignored.txt", &mut context)?, Flow::Continue);
    assert!(!dir.path().join("ignored.txt").exists());
    assert!(host.lock().stdout.is_empty());
    Ok(())
}

#[test]
fn it_redirects_output_and_input() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());

    execute("echo hello > f.txt", &mut context)?;
    execute("cat < f.txt > g.txt", &mut context)?;

    assert_eq!(fs::read_to_string(dir.path().join("f.txt")).unwrap(), "hello\n");
    assert_eq!(fs::read_to_string(dir.path().join("g.txt")).unwrap(), "hello\n");
    Ok(())
}

#[test]
fn it_truncates_redirected_output() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());
    fs::write(dir.path().join("f.txt"), "previous contents\n").unwrap();

    execute("echo new > f.txt", &mut context)?;

    assert_eq!(fs::read_to_string(dir.path().join("f.txt")).unwrap(), "new\n");
    Ok(())
}

#[test]
fn it_reports_missing_input_files() {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());

    let result = execute("cat < missing.txt", &mut context);

    assert!(matches!(
        result,
        Err(EvalError::FileDescriptorError(
            0,
            FileDescriptorError::FileNotReadable(_, _)
        ))
    ));
}

#[test]
fn it_reports_unwritable_output_files() {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());

    let result = execute("echo hello > missing-dir/out.txt", &mut context);

    assert!(matches!(
        result,
        Err(EvalError::FileDescriptorError(
            1,
            FileDescriptorError::FileNotWritable(_, _)
        ))
    ));
}

#[test]
fn it_reports_unknown_commands() {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());

    let result = execute("opsh-missing-program --flag", &mut context);

    assert!(matches!(result, Err(EvalError::UnknownCommand(name)) if name == "opsh-missing-program"));
}

#[test]
fn it_connects_pipeline_stages_in_order() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());
    fs::write(dir.path().join("in.txt"), "banana\napple\ncherry\napple\n").unwrap();

    let flow = execute("cat < in.txt | sort | uniq > out.txt", &mut context)?;

    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "apple\nbanana\ncherry\n"
    );
    assert!(context.jobs.lock().is_empty());
    Ok(())
}

#[test]
fn it_passes_bytes_through_pipelines_unchanged() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());

    // Larger than a pipe buffer. Every stage only sees end of input if no write
    // end is left open in the shell.
    let data: Vec<u8> = (0..512 * 1024).map(|i| (i % 251) as u8).collect();
    fs::write(dir.path().join("in.bin"), &data).unwrap();

    execute("cat < in.bin | cat | cat > out.bin", &mut context)?;

    assert_eq!(fs::read(dir.path().join("out.bin")).unwrap(), data);
    Ok(())
}

#[test]
fn it_waits_for_spawned_stages_when_a_later_stage_fails() {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());

    let result = execute("echo hello | opsh-missing-program", &mut context);

    assert!(matches!(result, Err(EvalError::UnknownCommand(_))));
    assert!(context.jobs.lock().is_empty());
}

#[test]
fn it_dispatches_builtins() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());
    context.register_builtin(Box::new(QuitCommand));

    let flow = execute("quit", &mut context)?;

    assert_eq!(flow, Flow::Exit(0));
    assert_eq!(flow.status(), 0);
    Ok(())
}

#[test]
fn it_does_not_dispatch_builtins_within_pipelines() {
    let dir = TempDir::new().unwrap();
    let (mut context, _) = context_in(dir.path());
    context.register_builtin(Box::new(QuitCommand));

    let result = execute("echo | quit", &mut context);

    assert!(matches!(result, Err(EvalError::UnknownCommand(name)) if name == "quit"));
}

#[test]
fn it_tracks_background_jobs_until_reaped() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, host) = context_in(dir.path());
    let reaper = Reaper::new(&context);

    let start = Instant::now();
    let flow = execute("sleep 0.3 &", &mut context)?;
    assert!(start.elapsed() < Duration::from_millis(300));
    assert_eq!(flow, Flow::Continue);

    let pids = context.jobs.lock().pids();
    assert_eq!(pids.len(), 1);
    let pid = pids[0];
    assert_eq!(host.lock().stdout, vec![format!("[{pid}] retval: 0")]);

    assert_eq!(reap_within(&reaper, Duration::from_secs(5)), 1);
    assert!(context.jobs.lock().is_empty());
    assert_eq!(
        host.lock().stdout,
        vec![
            format!("[{pid}] retval: 0"),
            format!("\n[{pid}] retval: 0")
        ]
    );
    assert_eq!(host.lock().prompts, 1);

    // Reaping again must not report the job a second time.
    assert_eq!(reaper.reap(), 0);
    assert_eq!(host.lock().stdout.len(), 2);
    Ok(())
}

#[test]
fn it_reports_background_exit_codes() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, host) = context_in(dir.path());
    let reaper = Reaper::new(&context);

    execute("false &", &mut context)?;
    let pid = context.jobs.lock().pids()[0];

    assert_eq!(reap_within(&reaper, Duration::from_secs(5)), 1);
    assert_eq!(host.lock().stdout.last(), Some(&format!("\n[{pid}] retval: 1")));
    Ok(())
}

#[test]
fn it_registers_every_stage_of_background_pipelines() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, host) = context_in(dir.path());

    execute("echo hello | cat > out.txt &", &mut context)?;

    let pids = context.jobs.lock().pids();
    assert_eq!(pids.len(), 2);
    assert_eq!(
        host.lock().stdout,
        pids.iter()
            .map(|pid| format!("[{pid}] retval: 0"))
            .collect::<Vec<_>>()
    );

    let mut reports = Vec::new();
    opsh_core::wait_all(&context.jobs, |completion| reports.push(completion.pid));
    assert_eq!(reports, pids);
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hello\n");
    Ok(())
}

#[test]
fn it_does_nothing_when_reaping_without_terminated_jobs() {
    let mut host = MockTestHost::new();
    host.expect_println().never();
    host.expect_redisplay_prompt().never();
    let context = Context::with_host(Arc::new(Mutex::new(host)), "/".into());
    let reaper = Reaper::new(&context);

    assert_eq!(reaper.reap(), 0);
    assert_eq!(reaper.reap(), 0);
    assert!(context.jobs.lock().is_empty());
}

#[test]
fn it_reaps_in_the_background_when_notified() -> EvalResult<()> {
    let dir = TempDir::new().unwrap();
    let (mut context, host) = context_in(dir.path());
    Reaper::new(&context).listen().expect("subscribed to SIGCHLD");

    execute("true &", &mut context)?;

    // The report is printed after the job has left the registry.
    let start = Instant::now();
    while host.lock().stdout.len() < 2 && start.elapsed() < Duration::from_secs(5) {
        thread::sleep(Duration::from_millis(10));
    }

    assert!(context.jobs.lock().is_empty());
    assert_eq!(host.lock().stdout.len(), 2);
    Ok(())
}
