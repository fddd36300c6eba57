mod token;
pub use token::{Generation, Superseding};

mod service;
pub use service::{DispatchError, Dispatcher, Lifecycle, Pending};

mod selector;
pub use selector::{Selection, Selector};

use std::sync::{Mutex, MutexGuard, PoisonError};

// the guarded state stays consistent even if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
