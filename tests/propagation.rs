use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use faultline::ErrHandle;
use faultline::Flow;
use faultline::Scope;
use faultline::Status;
use faultline::catch;
use faultline::fail_break;
use faultline::finish;
use faultline::finish_terminal;
use faultline::ignore;

// The pool, name registry, and hooks are process-wide; scenarios take
// this guard so they observe them exclusively.
static SCENARIO: Mutex<()> = Mutex::new(());

fn init_diagnostics() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .try_init();
}

fn capture_sink() -> Arc<Mutex<Vec<String>>> {
  let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

  faultline::hooks::set_log_sink({
    let lines: Arc<Mutex<Vec<String>>> = Arc::clone(&lines);

    move |line| lines.lock().push(line.to_string())
  });

  lines
}

fn counting_unhandled_hook() -> (Arc<AtomicUsize>, Arc<Mutex<Option<faultline::ErrorRecord>>>) {
  let fired: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
  let seen: Arc<Mutex<Option<faultline::ErrorRecord>>> = Arc::new(Mutex::new(None));

  faultline::hooks::set_unhandled_hook({
    let fired: Arc<AtomicUsize> = Arc::clone(&fired);
    let seen: Arc<Mutex<Option<faultline::ErrorRecord>>> = Arc::clone(&seen);

    move |record| {
      fired.fetch_add(1, Ordering::SeqCst);
      *seen.lock() = record.cloned();
    }
  });

  (fired, seen)
}

fn failing_leaf() -> Option<ErrHandle> {
  let mut scope: Scope = Scope::enter("failing_leaf");

  scope.attempt(|s| {
    fail_break!(s, Status::NULL_POINTER, "x failed");
  });
  scope.dispatch();

  finish!(scope)
}

fn passing_middle() -> Option<ErrHandle> {
  let mut scope: Scope = Scope::enter("passing_middle");

  scope.attempt(|s| {
    catch!(s, failing_leaf());
    Flow::Continue
  });
  scope.dispatch();

  finish!(scope)
}

fn healthy_leaf() -> Option<ErrHandle> {
  let mut scope: Scope = Scope::enter("healthy_leaf");

  scope.succeed();
  scope.dispatch();

  finish!(scope)
}

#[test]
fn scenario_a_caught_at_top_level() {
  let _guard = SCENARIO.lock();
  init_diagnostics();

  let (fired, _) = counting_unhandled_hook();
  let caught: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

  let mut scope: Scope = Scope::enter("main");

  scope.attempt(|s| {
    catch!(s, passing_middle());
    Flow::Continue
  });
  scope.dispatch().handle(Status::NULL_POINTER, |record| {
    caught.lock().push(String::from("Caught exception"));
    assert_eq!(record.status(), Status::NULL_POINTER);
    assert_eq!(record.message(), "x failed");
  });

  finish_terminal!(scope);

  assert_eq!(caught.lock().len(), 1);
  assert_eq!(fired.load(Ordering::SeqCst), 0);
  assert_eq!(faultline::pool::live_records(), 0);
}

#[test]
fn scenario_b_unhandled_reaches_hook_with_full_trace() {
  let _guard = SCENARIO.lock();
  init_diagnostics();

  let lines: Arc<Mutex<Vec<String>>> = capture_sink();
  let (fired, seen) = counting_unhandled_hook();

  let mut scope: Scope = Scope::enter("main");

  scope.attempt(|s| {
    catch!(s, passing_middle());
    Flow::Continue
  });
  scope.dispatch();

  finish_terminal!(scope);

  assert_eq!(fired.load(Ordering::SeqCst), 1);

  let record: faultline::ErrorRecord = seen.lock().take().expect("hook received the record");

  // Default hook behavior would exit the process with this code.
  assert_eq!(record.status(), Status::NULL_POINTER);
  assert_eq!(record.status().code(), 1);
  assert_eq!(record.message(), "x failed");

  // One trace entry per frame: the leaf's fail, the middle frame's
  // detection, and main's detection.
  assert_eq!(record.trace().len(), 3);
  assert!(record.trace().entries()[0].note().contains("x failed"));
  assert!(record.trace().entries()[1].note().contains("detected error"));
  assert!(record.trace().entries()[2].note().contains("detected error"));

  let logged: Vec<String> = lines.lock().clone();

  assert_eq!(logged.iter().filter(|line| line.contains("Unhandled Error")).count(), 1);
  assert_eq!(faultline::pool::live_records(), 0);
}

#[test]
fn scenario_c_cleanup_runs_after_short_circuit() {
  let _guard = SCENARIO.lock();
  init_diagnostics();

  let mut shared: i32 = 12345;

  let propagated: Option<ErrHandle> = {
    let mut scope: Scope = Scope::enter("middle");

    scope
      .attempt(|s| {
        catch!(s, failing_leaf());
        Flow::Continue
      })
      .cleanup(|| shared = 0);
    scope.dispatch();

    finish!(scope)
  };

  assert_eq!(shared, 0);

  let handle: ErrHandle = propagated.expect("failure propagates past cleanup");

  assert_eq!(handle.status(), Status::NULL_POINTER);
  assert!(faultline::release(Some(handle)).is_none());
  assert_eq!(faultline::pool::live_records(), 0);
}

#[test]
fn healthy_chain_yields_no_handle() {
  let _guard = SCENARIO.lock();

  let mut scope: Scope = Scope::enter("main");

  scope.attempt(|s| {
    catch!(s, healthy_leaf());
    Flow::Continue
  });
  scope.dispatch();

  finish_terminal!(scope);

  assert_eq!(faultline::pool::live_records(), 0);
}

#[test]
fn ignored_errors_are_logged_and_released() {
  let _guard = SCENARIO.lock();

  let lines: Arc<Mutex<Vec<String>>> = capture_sink();
  let mut scope: Scope = Scope::enter("main");

  let _ = ignore!(scope, failing_leaf());

  let logged: Vec<String> = lines.lock().clone();

  assert_eq!(logged.len(), 1);
  assert!(logged[0].contains("** IGNORED ERROR **"));
  assert!(logged[0].contains("x failed"));

  finish_terminal!(scope);

  assert_eq!(faultline::pool::live_records(), 0);
}

#[test]
fn default_branch_catches_unmatched_status() {
  let _guard = SCENARIO.lock();

  let (fired, _) = counting_unhandled_hook();
  let mut fallback: bool = false;

  let mut scope: Scope = Scope::enter("main");

  scope.attempt(|s| {
    catch!(s, passing_middle());
    Flow::Continue
  });
  scope
    .dispatch()
    .handle(Status::KEY, |_| panic!("wrong branch"))
    .handle_default(|record| {
      fallback = true;
      assert_eq!(record.status(), Status::NULL_POINTER);
    });

  finish_terminal!(scope);

  assert!(fallback);
  assert_eq!(fired.load(Ordering::SeqCst), 0);
  assert_eq!(faultline::pool::live_records(), 0);
}
