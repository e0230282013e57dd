#[macro_export]
macro_rules! debug {
    ($context:expr, $($argument:tt)+) => {
        if $context.options().debug {
            $context
                .console()
                .lock()
                .await
                .write_stderr(("debug: ".to_owned() + &format!($($argument)+) + "\n").as_bytes())
                .await?;
        }
    };
}

#[macro_export]
macro_rules! log {
    ($context:expr, $($argument:tt)+) => {
        $context
            .console()
            .lock()
            .await
            .write_stdout((format!($($argument)+) + "\n").as_bytes())
            .await?
    };
}

#[macro_export]
macro_rules! log_error {
    ($context:expr, $($argument:tt)+) => {
        $context
            .console()
            .lock()
            .await
            .write_stderr((format!($($argument)+) + "\n").as_bytes())
            .await?
    };
}
