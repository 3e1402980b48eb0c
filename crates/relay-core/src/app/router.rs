//! Router - 実行時の型でメッセージをハンドラに振り分ける
//!
//! # 使用例
//! ```ignore
//! let mut router = Router::new(Boss::default())?;
//!
//! if !router.deliver(&RequestMessage::new("Make worker work!"))? {
//!     // どのハンドラにも一致しなかった
//! }
//! ```
//!
//! # 設計
//! - 構築時に一度だけテーブルを作る（または TableCache から取得する）
//! - 構築後はテーブルを読むだけ
//! - ハンドラの失敗は RouteError::Delegation に包んで返す（リトライしない）

use std::any::Any;
use std::sync::Arc;

use tracing::{debug, trace};

use super::cache::TableCache;
use super::table::DispatchTable;
use crate::domain::{ConfigurationError, RouteError};
use crate::ports::DelegatingActor;
use crate::typed::MessageTarget;

/// Owns a target and the dispatch table built for its type.
pub struct Router<T> {
    target: T,
    table: Arc<DispatchTable<T>>,
    label: String,
}

impl<T: MessageTarget> Router<T> {
    /// Build the table for `T` and wrap `target`.
    pub fn new(target: T) -> Result<Self, ConfigurationError> {
        Self::builder(target).build()
    }

    pub fn builder(target: T) -> RouterBuilder<'static, T> {
        RouterBuilder {
            target,
            cache: None,
            label: None,
        }
    }

    /// Dispatch `message` to the handler declared for its runtime type.
    ///
    /// Returns `Ok(false)` without side effects when no handler matches.
    pub fn route(&mut self, message: Option<&dyn Any>) -> Result<bool, RouteError> {
        let message = message.ok_or(RouteError::InvalidArgument)?;

        let Some((role, entry)) = self.table.lookup(message.type_id()) else {
            debug!(router = %self.label, "no handler for message of unnamed runtime type");
            return Ok(false);
        };

        trace!(
            router = %self.label,
            role = %role,
            method = entry.method(),
            message_type = entry.message_type().name(),
            "dispatching message"
        );
        entry
            .invoker()
            .invoke(&mut self.target, message)
            .map_err(|source| RouteError::Delegation {
                method: entry.method().to_string(),
                message_type: entry.message_type().name(),
                source,
            })?;
        Ok(true)
    }

    /// Route a concrete value.
    ///
    /// `M` is the runtime type used for lookup, so pass the payload itself
    /// rather than a box around it (`&*boxed` for a `Box<dyn Any>`).
    pub fn deliver<M: Any>(&mut self, message: &M) -> Result<bool, RouteError> {
        self.route(Some(message))
    }

    /// Total handlers across all roles.
    pub fn mapped_handler_count(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &DispatchTable<T> {
        &self.table
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }
}

impl<T: DelegatingActor> Router<T> {
    /// Route `message`, handing it to [`DelegatingActor::unhandled`] when no
    /// handler matched.
    ///
    /// Returns whether a handler ran.
    pub fn on_receive(&mut self, message: &dyn Any) -> Result<bool, RouteError> {
        if self.route(Some(message))? {
            return Ok(true);
        }
        self.target.unhandled(message);
        Ok(false)
    }
}

/// Configures how a [`Router`] obtains its table.
///
/// # Fail-fast 設計
/// - build() でテーブルを構築し、不整合があれば ConfigurationError を返す
/// - Router は有効なテーブルなしには存在しない
pub struct RouterBuilder<'c, T> {
    target: T,
    cache: Option<&'c TableCache>,
    label: Option<String>,
}

impl<'c, T: MessageTarget> RouterBuilder<'c, T> {
    /// Share the table through `cache` instead of building a private one.
    pub fn cache<'n>(self, cache: &'n TableCache) -> RouterBuilder<'n, T> {
        RouterBuilder {
            target: self.target,
            cache: Some(cache),
            label: self.label,
        }
    }

    /// Name shown in log lines (defaults to the target type name).
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn build(self) -> Result<Router<T>, ConfigurationError> {
        let table = match self.cache {
            Some(cache) => cache.get_or_build::<T>()?,
            None => Arc::new(DispatchTable::<T>::build()?),
        };
        let label = self
            .label
            .unwrap_or_else(|| std::any::type_name::<T>().to_string());

        debug!(router = %label, handlers = table.len(), "router ready");
        Ok(Router {
            target: self.target,
            table,
            label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Contract;
    use crate::typed::{MethodSet, predef};
    use rstest::rstest;
    use std::any::TypeId;

    /// Records which methods ran, like a spy.
    #[derive(Default)]
    struct Example {
        invoked: Vec<&'static str>,
    }

    impl MessageTarget for Example {
        fn contracts() -> Vec<Contract> {
            vec![predef::requests2(), predef::responses1(), predef::events2()]
        }

        fn methods(methods: &mut MethodSet<Self>) {
            methods
                .on("on_request", |e: &mut Example, _: &i64| e.invoked.push("on_request"))
                .on("on_request2", |e: &mut Example, _: &i32| e.invoked.push("on_request2"))
                .on("on_response", |e: &mut Example, _: &i16| e.invoked.push("on_response"))
                .on("on_event", |e: &mut Example, _: &i8| e.invoked.push("on_event"))
                .on("on_event2", |e: &mut Example, _: &f64| e.invoked.push("on_event2"));
        }
    }

    fn example() -> Router<Example> {
        Router::new(Example::default()).unwrap()
    }

    #[rstest]
    #[case::request_i64(Box::new(1_i64), "on_request")]
    #[case::request2_i32(Box::new(1_i32), "on_request2")]
    #[case::response_i16(Box::new(1_i16), "on_response")]
    #[case::event_i8(Box::new(1_i8), "on_event")]
    #[case::event2_f64(Box::new(1.0_f64), "on_event2")]
    fn routes_to_exactly_one_handler(#[case] message: Box<dyn Any>, #[case] expected: &str) {
        let mut router = example();

        assert!(router.route(Some(&*message)).unwrap());
        assert_eq!(router.target().invoked, vec![expected]);
    }

    #[test]
    fn unmatched_type_returns_false_without_side_effects() {
        let mut router = example();

        assert!(!router.deliver(&String::from("1")).unwrap());
        assert!(!router.deliver(&1_u64).unwrap());
        assert!(router.target().invoked.is_empty());
    }

    #[test]
    fn absent_message_is_invalid() {
        let mut router = example();
        assert!(matches!(router.route(None), Err(RouteError::InvalidArgument)));

        struct Nothing;
        impl MessageTarget for Nothing {
            fn contracts() -> Vec<Contract> {
                Vec::new()
            }
            fn methods(_: &mut MethodSet<Self>) {}
        }
        let mut empty = Router::new(Nothing).unwrap();
        assert!(matches!(empty.route(None), Err(RouteError::InvalidArgument)));
    }

    #[test]
    fn boxed_payload_routes_by_its_contents() {
        let mut router = example();
        let boxed: Box<dyn Any + Send> = Box::new(3_i32);

        assert!(router.route(Some(&*boxed)).unwrap());
        assert!(!router.deliver(&boxed).unwrap());
        assert_eq!(router.target().invoked, vec!["on_request2"]);
    }

    #[test]
    fn mapped_handler_count_sums_all_roles() {
        assert_eq!(example().mapped_handler_count(), 5);
    }

    #[derive(Default)]
    struct SameName {
        invoked: Vec<&'static str>,
    }

    impl MessageTarget for SameName {
        fn contracts() -> Vec<Contract> {
            vec![Contract::events("SimilarMethods")
                .handles::<i32>("some_method")
                .handles::<i64>("some_method")]
        }

        fn methods(methods: &mut MethodSet<Self>) {
            methods
                .on("some_method", |s: &mut SameName, _: &i32| s.invoked.push("some_method_i32"))
                .on("some_method", |s: &mut SameName, _: &i64| s.invoked.push("some_method_i64"));
        }
    }

    #[test]
    fn overloads_under_one_name_are_routed_separately() {
        let mut router = Router::new(SameName::default()).unwrap();

        router.deliver(&1_i32).unwrap();
        assert_eq!(router.target().invoked, vec!["some_method_i32"]);

        router.deliver(&1_i64).unwrap();
        assert_eq!(router.target().invoked, vec!["some_method_i32", "some_method_i64"]);
    }

    #[derive(Debug, thiserror::Error)]
    #[error("worker refused {0}")]
    struct Refused(u32);

    #[derive(Default)]
    struct Failing {
        attempts: usize,
    }

    impl MessageTarget for Failing {
        fn contracts() -> Vec<Contract> {
            vec![predef::requests1()]
        }

        fn methods(methods: &mut MethodSet<Self>) {
            methods.on("on_request", |f: &mut Failing, n: &u32| -> Result<(), Refused> {
                f.attempts += 1;
                Err(Refused(*n))
            });
        }
    }

    #[test]
    fn handler_failure_is_wrapped_in_delegation_error() {
        use std::error::Error as _;

        let mut router = Router::new(Failing::default()).unwrap();
        let err = router.deliver(&7_u32).unwrap_err();

        let RouteError::Delegation { method, message_type, source } = &err else {
            panic!("expected Delegation");
        };
        assert_eq!(method, "on_request");
        assert_eq!(*message_type, "u32");
        assert!(source.downcast_ref::<Refused>().is_some());
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("worker refused 7"));
        assert_eq!(router.target().attempts, 1);
    }

    #[test]
    fn separate_builds_route_identically() {
        let mut a = example();
        let mut b = example();
        let messages: Vec<Box<dyn Any>> = vec![
            Box::new(1_i64),
            Box::new(1_i32),
            Box::new(1_i16),
            Box::new(1_i8),
            Box::new(1.0_f64),
            Box::new("nope"),
        ];

        for message in &messages {
            assert_eq!(a.route(Some(&**message)).unwrap(), b.route(Some(&**message)).unwrap());
        }
        assert_eq!(a.target().invoked, b.target().invoked);
        assert_eq!(a.table().summary(), b.table().summary());
    }

    #[test]
    fn cached_routers_share_one_table_across_threads() {
        let cache = TableCache::new();
        let routers: Vec<Router<Example>> = (0..4)
            .map(|i| {
                Router::builder(Example::default())
                    .cache(&cache)
                    .label(format!("example-{i}"))
                    .build()
                    .unwrap()
            })
            .collect();
        assert!(routers.windows(2).all(|w| std::ptr::eq(w[0].table(), w[1].table())));

        let results: Vec<Vec<&'static str>> = std::thread::scope(|s| {
            let handles: Vec<_> = routers
                .into_iter()
                .map(|mut router| {
                    s.spawn(move || {
                        router.deliver(&1_i64).unwrap();
                        router.deliver(&1.0_f64).unwrap();
                        router.into_target().invoked
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.iter().all(|invoked| invoked == &vec!["on_request", "on_event2"]));
    }

    #[test]
    fn label_defaults_to_target_type() {
        assert!(example().label().ends_with("Example"));
        let labelled = Router::builder(Example::default()).label("spy").build().unwrap();
        assert_eq!(labelled.label(), "spy");
        assert_eq!(labelled.table().lookup(TypeId::of::<i16>()).map(|(_, e)| e.method()), Some("on_response"));
    }

    #[derive(Default)]
    struct Delegating {
        handled: Vec<u8>,
        unhandled: Vec<TypeId>,
    }

    impl MessageTarget for Delegating {
        fn contracts() -> Vec<Contract> {
            vec![predef::events1()]
        }

        fn methods(methods: &mut MethodSet<Self>) {
            methods.on("on_event", |d: &mut Delegating, n: &u8| d.handled.push(*n));
        }
    }

    impl DelegatingActor for Delegating {
        fn unhandled(&mut self, message: &dyn Any) {
            self.unhandled.push(message.type_id());
        }
    }

    #[test]
    fn on_receive_falls_back_to_unhandled() {
        let mut router = Router::new(Delegating::default()).unwrap();

        assert!(router.on_receive(&4_u8).unwrap());
        assert!(!router.on_receive(&"four").unwrap());

        let target = router.into_target();
        assert_eq!(target.handled, vec![4]);
        assert_eq!(target.unhandled, vec![TypeId::of::<&str>()]);
    }
}
