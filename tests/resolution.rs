use autowire::{
    constructor, interfaces, Autowired, Config, ConstructErrorKind, Constructor, Container, Inject, Injectable,
    InstantiateErrorKind, Interface, RegisterErrorKind, ResolveErrorKind, TypeInfo,
};
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc, Mutex,
};

trait IA: Send + Sync {
    fn parts(&self) -> (&dyn IB, &dyn IC);
}
trait IB: Send + Sync {
    fn constructor(&self) -> &'static str;
    fn e(&self) -> Option<&dyn IE>;
}
trait IC: Send + Sync {}
trait ID: Send + Sync {}
trait IE: Send + Sync {
    fn constructor(&self) -> &'static str;
}
trait IF: Send + Sync {}

struct A {
    b: Arc<dyn IB>,
    c: Arc<dyn IC>,
}

impl IA for A {
    fn parts(&self) -> (&dyn IB, &dyn IC) {
        (&*self.b, &*self.c)
    }
}

impl Injectable for A {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn IA]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Inject(b): Inject<dyn IB>, Inject(c): Inject<dyn IC>| Ok(A { b, c }))]
    }
}

#[allow(dead_code)]
enum B {
    FromA(Arc<dyn IA>),
    FromDE(Arc<dyn ID>, Arc<dyn IE>),
}

impl IB for B {
    fn constructor(&self) -> &'static str {
        match self {
            Self::FromA(_) => "B(IA)",
            Self::FromDE(..) => "B(ID, IE)",
        }
    }

    fn e(&self) -> Option<&dyn IE> {
        match self {
            Self::FromA(_) => None,
            Self::FromDE(_, e) => Some(&**e),
        }
    }
}

impl Injectable for B {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn IB]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            constructor(|Inject(a): Inject<dyn IA>| Ok(B::FromA(a))),
            constructor(|Inject(d): Inject<dyn ID>, Inject(e): Inject<dyn IE>| Ok(B::FromDE(d, e))),
        ]
    }
}

struct C;

impl IC for C {}

impl Injectable for C {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn IC]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|| Ok(C))]
    }
}

struct D;

impl ID for D {}

impl Injectable for D {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn ID]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|| Ok(D))]
    }
}

#[allow(dead_code)]
enum E {
    FromA(Arc<dyn IA>),
    FromF(Arc<dyn IF>),
}

impl IE for E {
    fn constructor(&self) -> &'static str {
        match self {
            Self::FromA(_) => "E(IA)",
            Self::FromF(_) => "E(IF)",
        }
    }
}

impl Injectable for E {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn IE]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            constructor(|Inject(a): Inject<dyn IA>| Ok(E::FromA(a))),
            constructor(|Inject(f): Inject<dyn IF>| Ok(E::FromF(f))),
        ]
    }
}

struct F;

impl IF for F {}

impl Injectable for F {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn IF]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|| Ok(F))]
    }
}

#[test]
fn test_cyclic_traps_scenario() {
    let mut container = Container::new();
    container.register_transient::<dyn IF, F>().unwrap();
    container.register_transient::<dyn IE, E>().unwrap();
    container.register_transient::<dyn ID, D>().unwrap();
    container.register_transient::<dyn IC, C>().unwrap();
    container.register_transient::<dyn IB, B>().unwrap();
    container.register_transient::<dyn IA, A>().unwrap();

    let a = container.resolve::<dyn IA>().unwrap();
    let (b, _c) = a.parts();

    assert_eq!(b.constructor(), "B(ID, IE)");
    assert_eq!(b.e().unwrap().constructor(), "E(IF)");
}

#[test]
fn test_registration_needs_registered_abstractions() {
    let mut container = Container::new();
    container.register_transient::<dyn IC, C>().unwrap();

    // `B(ID, IE)` needs abstractions that aren't registered yet, `B(IA)` too
    let err = container.register_transient::<dyn IB, B>().unwrap_err();

    assert!(matches!(err, RegisterErrorKind::NotConstructible { .. }));
    assert!(!container.contains::<dyn IB>());
    assert_eq!(container.registry().len(), 1);
}

#[test]
fn test_type_mismatch() {
    let mut container = Container::new();

    let err = container.register_transient::<dyn IB, C>().unwrap_err();
    assert!(matches!(
        err,
        RegisterErrorKind::TypeMismatch { abstraction, implementation }
            if abstraction == TypeInfo::of::<dyn IB>() && implementation == TypeInfo::of::<C>()
    ));

    let err = container.register_instance::<dyn ID, C>(C).unwrap_err();
    assert!(matches!(err, RegisterErrorKind::TypeMismatch { .. }));

    assert!(container.registry().is_empty());
}

static SMALL_CALLS: AtomicU8 = AtomicU8::new(0);
static LARGE_CALLS: AtomicU8 = AtomicU8::new(0);

struct Greeting(&'static str);

impl Injectable for Greeting {}

struct Punctuation;

impl Injectable for Punctuation {}

struct Message(String);

impl Injectable for Message {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            constructor(|Inject(greeting): Inject<Greeting>, Inject(_): Inject<Punctuation>| {
                LARGE_CALLS.fetch_add(1, Ordering::SeqCst);
                Ok(Message(format!("{}!", greeting.0)))
            }),
            constructor(|Inject(greeting): Inject<Greeting>| {
                SMALL_CALLS.fetch_add(1, Ordering::SeqCst);
                Ok(Message(greeting.0.to_owned()))
            }),
        ]
    }
}

#[test]
fn test_fewer_parameters_preferred() {
    let mut container = Container::new();
    container.register_instance::<Greeting, Greeting>(Greeting("hello")).unwrap();
    container.register_instance::<Punctuation, Punctuation>(Punctuation).unwrap();

    assert!(container.can_construct::<Message>());
    let message = container.construct::<Message>().unwrap();

    assert_eq!(message.0, "hello");
    assert_eq!(SMALL_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(LARGE_CALLS.load(Ordering::SeqCst), 0);
}

struct X;
struct Y;
struct Z;

impl Injectable for X {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Autowired(_): Autowired<Y>| Ok(X))]
    }
}

impl Injectable for Y {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Autowired(_): Autowired<Z>| Ok(Y))]
    }
}

impl Injectable for Z {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Autowired(_): Autowired<X>| Ok(Z))]
    }
}

trait Loop: Send + Sync {}

struct SelfLoop;

impl Loop for SelfLoop {}

impl Injectable for SelfLoop {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn Loop]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Inject(_): Inject<dyn Loop>| Ok(SelfLoop))]
    }
}

#[test]
fn test_transitive_cycle() {
    let mut container = Container::new();

    assert!(!container.can_construct::<X>());
    let err = container.construct::<X>().err().unwrap();
    assert!(matches!(err, ResolveErrorKind::NotConstructible { .. }));
    assert!(err.to_string().contains("Cyclic dependency detected: X -> Y -> Z -> X"));

    let err = container.register_singleton::<X, X>().unwrap_err();
    assert!(matches!(err, RegisterErrorKind::NotConstructible { .. }));
}

#[test]
fn test_direct_cycle() {
    let mut container = Container::new();

    let err = container.register_transient::<dyn Loop, SelfLoop>().unwrap_err();
    let RegisterErrorKind::NotConstructible { reason, .. } = err else {
        panic!("unexpected error");
    };
    let ConstructErrorKind::Unsatisfied { rejected, .. } = reason else {
        panic!("unexpected reason");
    };
    assert!(matches!(rejected[0], ConstructErrorKind::CyclicDependency { .. }));
    assert!(!container.contains::<dyn Loop>());
}

#[test]
fn test_conflict_keeps_original() {
    let mut container = Container::new();
    container.register_transient::<dyn IF, F>().unwrap();

    let err = container.register_transient::<dyn IF, F>().unwrap_err();
    assert!(matches!(err, RegisterErrorKind::Conflict { .. }));
    assert!(container.resolve::<dyn IF>().is_ok());
}

struct Counter {
    value: u8,
}

impl Injectable for Counter {}

#[test]
fn test_replace_uses_new_producer() {
    let mut container = Container::new();
    container.register_transient_factory::<Counter, Counter, _>(|| Ok(Counter { value: 1 })).unwrap();
    container
        .register_transient_factory_with_config::<Counter, Counter, _>(|| Ok(Counter { value: 2 }), Config::replace())
        .unwrap();

    assert_eq!(container.resolve::<Counter>().unwrap().value, 2);
    assert_eq!(container.registry().len(), 1);
}

static SINGLETON_BUILDS: AtomicU8 = AtomicU8::new(0);

struct Pool;

impl Injectable for Pool {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|| {
            SINGLETON_BUILDS.fetch_add(1, Ordering::SeqCst);
            Ok(Pool)
        })]
    }
}

struct Handler(Arc<Pool>);

impl Injectable for Handler {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Inject(pool): Inject<Pool>| Ok(Handler(pool)))]
    }
}

#[test]
fn test_singleton_identity_and_transient_distinctness() {
    let mut container = Container::new();
    container.register_singleton::<Pool, Pool>().unwrap();
    assert_eq!(SINGLETON_BUILDS.load(Ordering::SeqCst), 1);

    let pool = container.resolve::<Pool>().unwrap();
    assert!(Arc::ptr_eq(&pool, &container.resolve::<Pool>().unwrap()));
    assert_eq!(SINGLETON_BUILDS.load(Ordering::SeqCst), 1);

    container.register_transient::<Handler, Handler>().unwrap();
    let first = container.resolve::<Handler>().unwrap();
    let second = container.resolve::<Handler>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    // An auto-constructed dependency is built through its implementation type
    assert!(!Arc::ptr_eq(&first.0, &second.0));
    assert!(!Arc::ptr_eq(&pool, &first.0));
    assert_eq!(SINGLETON_BUILDS.load(Ordering::SeqCst), 3);
}

static SENTRY_BUILDS: AtomicU8 = AtomicU8::new(0);

trait Guard: Send + Sync {
    fn watched(&self) -> bool;
}

struct Sentry {
    watched: bool,
}

impl Guard for Sentry {
    fn watched(&self) -> bool {
        self.watched
    }
}

impl Injectable for Sentry {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn Guard]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            constructor(|Autowired(_): Autowired<Warden>| Ok(Sentry { watched: true })),
            constructor(|Inject(_): Inject<Greeting>, Inject(_): Inject<Greeting>| {
                SENTRY_BUILDS.fetch_add(1, Ordering::SeqCst);
                Ok(Sentry { watched: false })
            }),
        ]
    }
}

struct Warden(Arc<dyn Guard>);

impl Injectable for Warden {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Inject(guard): Inject<dyn Guard>| Ok(Warden(guard)))]
    }
}

#[test]
fn test_cycle_through_singleton_dependency() {
    let mut container = Container::new();
    container.register_instance::<Greeting, Greeting>(Greeting("hello")).unwrap();
    container.register_singleton::<dyn Guard, Sentry>().unwrap();
    assert_eq!(SENTRY_BUILDS.load(Ordering::SeqCst), 1);

    // `Warden -> Sentry -> Warden` is seen and `Sentry` falls back to its second constructor
    assert!(container.can_construct::<Warden>());
    let warden = container.construct::<Warden>().unwrap();

    assert!(!warden.0.watched());
    assert_eq!(SENTRY_BUILDS.load(Ordering::SeqCst), 2);
    assert!(!container.resolve::<dyn Guard>().unwrap().watched());
}

#[test]
fn test_clear_then_resolve() {
    let mut container = Container::new();
    container.register_transient::<dyn IF, F>().unwrap();
    container.register_singleton::<dyn IC, C>().unwrap();

    container.clear();

    assert!(matches!(container.resolve::<dyn IF>(), Err(ResolveErrorKind::NotRegistered { .. })));
    assert!(matches!(container.resolve::<dyn IC>(), Err(ResolveErrorKind::NotRegistered { .. })));
    assert!(container.registry().is_empty());
}

struct Settings(Arc<Mutex<bool>>);

impl Injectable for Settings {}

struct Database;

impl Injectable for Database {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            constructor(|Inject(config): Inject<Settings>| {
                *config.0.lock().unwrap() = true;
                Err::<Database, _>(InstantiateErrorKind::Custom(anyhow::anyhow!("connection refused")))
            }),
            constructor(|Inject(_): Inject<Settings>, Inject(_): Inject<Greeting>| Ok(Database)),
        ]
    }
}

#[test]
fn test_failing_constructor_is_terminal() {
    let called = Arc::new(Mutex::new(false));
    let mut container = Container::new();
    container.register_instance::<Settings, Settings>(Settings(called.clone())).unwrap();
    container.register_instance::<Greeting, Greeting>(Greeting("hello")).unwrap();

    // The feasibility check doesn't call constructors
    container.register_transient::<Database, Database>().unwrap();
    assert!(!*called.lock().unwrap());

    let err = container.resolve::<Database>().err().unwrap();
    let ResolveErrorKind::NotConstructible { reason, .. } = err else {
        panic!("unexpected error");
    };
    assert!(matches!(reason, ConstructErrorKind::Instantiate { .. }));
    assert!(*called.lock().unwrap());
}

trait IQ: Send + Sync {}

struct Q;

impl IQ for Q {}

impl Injectable for Q {
    fn interfaces() -> Vec<Interface<Self>> {
        interfaces![dyn IQ]
    }

    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|| Ok(Q))]
    }
}

struct User(#[allow(dead_code)] Arc<dyn IQ>);

impl Injectable for User {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor(|Inject(q): Inject<dyn IQ>| Ok(User(q)))]
    }
}

#[test]
fn test_transient_fails_after_dependency_replaced() {
    let mut container = Container::new();
    container.register_transient::<dyn IQ, Q>().unwrap();
    container.register_transient::<User, User>().unwrap();
    assert!(container.resolve::<User>().is_ok());

    container
        .register_transient_factory_with_config::<dyn IQ, Q, _>(
            || Err::<Q, _>(InstantiateErrorKind::Custom(anyhow::anyhow!("gone"))),
            Config::replace(),
        )
        .unwrap();

    let err = container.resolve::<User>().err().unwrap();
    assert!(err.to_string().contains("gone"));
    let ResolveErrorKind::NotConstructible { implementation, reason } = err else {
        panic!("unexpected error");
    };
    assert_eq!(implementation, TypeInfo::of::<User>());
    assert!(matches!(reason, ConstructErrorKind::Dependency { dependency, .. } if dependency == TypeInfo::of::<dyn IQ>()));
}
