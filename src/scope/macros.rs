//! The facade macro family.
//!
//! These macros wrap the [`Scope`] methods and capture the call site via
//! `file!()` / `line!()`, the way the underlying protocol expects origins
//! to be recorded. The `*_break` forms are for use inside [`attempt`]
//! bodies (closures returning [`Flow`]); the `*_return` forms are for
//! functions returning `Option<ErrHandle>` directly.
//!
//! [`Scope`]: crate::Scope
//! [`Flow`]: crate::Flow
//! [`attempt`]: crate::Scope::attempt

/// Records a failure on a scope with a formatted message.
///
/// # Examples
///
/// ```
/// use faultline::Scope;
/// use faultline::Status;
/// use faultline::fail;
///
/// let mut scope = Scope::enter("demo");
///
/// fail!(scope, Status::VALUE, "bad value: {}", 7);
///
/// assert_eq!(scope.status(), Status::VALUE);
/// let _ = scope.settle();
/// ```
#[macro_export]
macro_rules! fail {
  ($scope:expr, $status:expr, $($arg:tt)+) => {
    $scope.fail_at($status, ::std::file!(), ::std::line!(), ::std::format!($($arg)+))
  };
}

/// Records a failure and short-circuits the enclosing attempt body.
///
/// # Examples
///
/// ```
/// use faultline::Scope;
/// use faultline::Status;
/// use faultline::fail_break;
///
/// let mut scope = Scope::enter("demo");
///
/// scope.attempt(|s| {
///   fail_break!(s, Status::IO, "device not ready");
/// });
///
/// assert_eq!(scope.status(), Status::IO);
/// let _ = scope.settle();
/// ```
#[macro_export]
macro_rules! fail_break {
  ($scope:expr, $status:expr, $($arg:tt)+) => {{
    $crate::fail!($scope, $status, $($arg)+);

    return $crate::Flow::Break;
  }};
}

/// Records success and short-circuits the enclosing attempt body.
#[macro_export]
macro_rules! succeed_break {
  ($scope:expr) => {{
    $scope.succeed();

    return $crate::Flow::Break;
  }};
}

/// Records a failure and short-circuits if `cond` does not hold.
///
/// Generalizes the zero/non-zero guard forms of the protocol to an
/// arbitrary predicate.
#[macro_export]
macro_rules! ensure_break {
  ($scope:expr, $cond:expr, $status:expr, $($arg:tt)+) => {
    if !$cond {
      $crate::fail_break!($scope, $status, $($arg)+);
    }
  };
}

/// Detects a sub-operation's returned handle inside an attempt body,
/// short-circuiting on a non-zero status.
///
/// # Examples
///
/// ```
/// use faultline::ErrHandle;
/// use faultline::Flow;
/// use faultline::Scope;
/// use faultline::Status;
/// use faultline::catch;
/// use faultline::fail;
///
/// fn leaf() -> Option<ErrHandle> {
///   let mut scope = Scope::enter("leaf");
///   fail!(scope, Status::KEY, "missing key");
///   scope.into_handle()
/// }
///
/// let mut scope = Scope::enter("demo");
///
/// scope.attempt(|s| {
///   catch!(s, leaf());
///   Flow::Continue
/// });
///
/// assert_eq!(scope.status(), Status::KEY);
/// let _ = scope.settle();
/// ```
#[macro_export]
macro_rules! catch {
  ($scope:expr, $sub:expr) => {
    if $scope.catch_at($sub, ::std::file!(), ::std::line!()).is_break() {
      return $crate::Flow::Break;
    }
  };
}

/// Records a failure and returns the scope's handle to the caller
/// (the direct-return failure path).
#[macro_export]
macro_rules! fail_return {
  ($scope:expr, $status:expr, $($arg:tt)+) => {{
    $crate::fail!($scope, $status, $($arg)+);

    return $scope.into_handle();
  }};
}

/// Records a failure and returns the handle if `cond` does not hold.
#[macro_export]
macro_rules! ensure_return {
  ($scope:expr, $cond:expr, $status:expr, $($arg:tt)+) => {
    if !$cond {
      $crate::fail_return!($scope, $status, $($arg)+);
    }
  };
}

/// Releases the scope's record and returns success (the direct-return
/// success path).
#[macro_export]
macro_rules! succeed_return {
  ($scope:expr) => {
    return $scope.settle();
  };
}

/// Propagating finish: forwards an unhandled record to the caller,
/// releases a handled or absent one.
#[macro_export]
macro_rules! finish {
  ($scope:expr) => {
    $scope.finish_at(::std::file!(), ::std::line!())
  };
}

/// Terminal finish: logs a still-unhandled record and invokes the
/// unhandled-error hook, then releases the record.
#[macro_export]
macro_rules! finish_terminal {
  ($scope:expr) => {
    $scope.finish_terminal_at(::std::file!(), ::std::line!())
  };
}

/// Logs a sub-operation's result as intentionally ignored and hands it
/// back for release through the normal path.
#[macro_export]
macro_rules! ignore {
  ($scope:expr, $sub:expr) => {
    $scope.ignore_at($sub, ::std::file!(), ::std::line!())
  };
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::pool::ErrHandle;
  use crate::scope::Flow;
  use crate::scope::Scope;
  use crate::status::Status;

  fn checked(value: i32) -> Option<ErrHandle> {
    let mut scope: Scope = Scope::enter("checked");

    ensure_return!(scope, value >= 0, Status::VALUE, "negative value {}", value);
    succeed_return!(scope);
  }

  #[test]
  fn test_ensure_return_passes() {
    assert!(checked(3).is_none());
  }

  #[test]
  fn test_ensure_return_fails() {
    let handle: ErrHandle = checked(-2).expect("guard should fail");

    assert_eq!(handle.status(), Status::VALUE);
    assert_eq!(handle.snapshot().message(), "negative value -2");
    assert!(!handle.release());
  }

  #[test]
  fn test_ensure_break_guards_attempt() {
    let mut scope: Scope = Scope::enter("guarded");
    let mut reached: bool = false;

    scope.attempt(|s| {
      ensure_break!(s, false, Status::API, "precondition violated");

      reached = true;

      Flow::Continue
    });

    assert!(!reached);
    assert_eq!(scope.status(), Status::API);

    let _ = scope.settle();
  }

  #[test]
  fn test_succeed_break_clears_status() {
    let mut scope: Scope = Scope::enter("demo");

    scope.attempt(|s| {
      succeed_break!(s);
    });

    assert_eq!(scope.status(), Status::OK);

    let _ = scope.settle();
  }
}
