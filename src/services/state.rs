use tokio::sync::watch;

/// Owned state slot with get / set / subscribe.
///
/// Each stateful component of a session gets its own cell so independent
/// components never contend on a shared lock. Closures passed to `update`
/// run under the cell's write lock and must not block or await.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T> StateCell<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut result = None;
        self.tx.send_modify(|value| result = Some(f(value)));
        result.expect("send_modify runs the closure exactly once")
    }

    /// Like `update`, but subscribers are only notified when `f` succeeds.
    pub fn try_update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let mut result = None;
        self.tx.send_if_modified(|value| {
            let outcome = f(value);
            let changed = outcome.is_ok();
            result = Some(outcome);
            changed
        });
        result.expect("send_if_modified runs the closure exactly once")
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T> Default for StateCell<T>
where
    T: Clone + Send + Sync + Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_update() {
        let cell = StateCell::new(1u32);
        cell.set(4);
        assert_eq!(cell.get(), 4);
        let doubled = cell.update(|v| {
            *v *= 2;
            *v
        });
        assert_eq!(doubled, 8);
        assert_eq!(cell.read(|v| *v + 1), 9);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let cell = StateCell::new(String::from("a"));
        let mut rx = cell.subscribe();
        cell.set("b".to_string());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "b");
    }

    #[test]
    fn failed_try_update_does_not_notify() {
        let cell = StateCell::new(0i32);
        let rx = cell.subscribe();

        let res: Result<(), &str> = cell.try_update(|_| Err("nope"));
        assert_eq!(res, Err("nope"));
        assert!(!rx.has_changed().unwrap());

        let res: Result<i32, &str> = cell.try_update(|v| {
            *v = 3;
            Ok(*v)
        });
        assert_eq!(res, Ok(3));
        assert!(rx.has_changed().unwrap());
    }
}
