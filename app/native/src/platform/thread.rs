use std::thread;

/// Spawns a background thread named `wallslide-{name}`.
///
/// Spawn failures are logged rather than returned: every caller treats its
/// background thread as best-effort.
pub fn spawn_named_thread<F>(name: &str, task: F)
where F: FnOnce() + Send + 'static {
    let thread_name = format!("wallslide-{name}");

    if let Err(err) = thread::Builder::new().name(thread_name.clone()).spawn(task) {
        tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;
    use std::time::Duration;

    use super::*;

    #[test]
    fn spawn_named_thread_executes_task() {
        let (tx, rx) = channel();

        spawn_named_thread("test-task", move || {
            tx.send(42).unwrap();
        });

        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), 42);
    }

    #[test]
    fn spawn_named_thread_uses_correct_prefix() {
        let (tx, rx) = channel();

        spawn_named_thread("name-test", move || {
            let name = thread::current().name().unwrap_or("").to_string();
            tx.send(name).unwrap();
        });

        let thread_name = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(thread_name, "wallslide-name-test");
    }
}
