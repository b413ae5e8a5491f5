mod futures;

pub use self::futures::FutureTimeout;
