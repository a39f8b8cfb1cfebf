use std::{fmt::Debug, marker::PhantomData};

use faultline::{CallArgs, FieldValue, ToFieldValue};

struct RequestContext;

#[derive(CallArgs)]
struct Lookup<'a, K, M> {
    #[call(context)]
    ctx: &'a RequestContext,
    key: K,
    #[call(debug)]
    mode: M,
    #[call(skip)]
    _marker: PhantomData<fn() -> M>,
}

#[derive(CallArgs)]
struct Shared<T> {
    items: Vec<T>,
    #[call(skip)]
    cache: Option<std::rc::Rc<()>>,
}

fn context_of<C: ?Sized, A: CallArgs<C>>(args: &A) -> Option<&C> {
    args.context()
}

fn assert_describable<T: ToFieldValue + Debug>(_: &T) {}

fn main() {
    let ctx = RequestContext;
    let lookup = Lookup {
        ctx: &ctx,
        key: 7_u16,
        mode: "fast",
        _marker: PhantomData,
    };
    assert!(context_of::<RequestContext, _>(&lookup).is_some());
    let fields = CallArgs::<RequestContext>::fields(&lookup);
    assert_eq!(fields.get("key"), Some(&FieldValue::Int(7)));
    assert_eq!(fields.get("mode"), Some(&FieldValue::Str("\"fast\"".into())));
    assert!(!fields.contains_key("_marker"));

    let shared = Shared {
        items: vec![1_i64, 2],
        cache: None,
    };
    assert_describable(&shared.items);
    assert!(context_of::<String, _>(&shared).is_none());
    assert!(context_of::<str, _>(&shared).is_none());
    assert_eq!(CallArgs::<()>::fields(&shared).len(), 1);
    let _ = shared.cache;
}
