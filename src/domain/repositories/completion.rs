use tokio::sync::oneshot;

/// Callback invoked once with the outcome of an operation.
pub type Completion<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Runs a callback-based operation and waits for its completion.
///
/// `start` is invoked exactly once with a completion that resolves the
/// returned future. Returns `None` if the completion is dropped without being
/// called.
pub(crate) async fn await_completion<T, F>(start: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce(Completion<T>),
{
    let (sender, receiver) = oneshot::channel();
    start(Box::new(move |value| {
        // The waiting side may have been dropped.
        let _ = sender.send(value);
    }));
    receiver.await.ok()
}
