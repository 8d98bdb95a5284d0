/// Unwraps an `Ok`, panicking with the error otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("expected Ok(_), got Err({:?})", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("{}: expected Ok(_), got Err({:?})", format!($($arg)+), err),
        }
    };
}

/// Asserts an `Err` and hands it back for further checks.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(_) => panic!("expected Err(_), got Ok(_)"),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(_) => panic!("{}: expected Err(_), got Ok(_)", format!($($arg)+)),
            Err(err) => err,
        }
    };
}
