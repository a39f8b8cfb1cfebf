//! How a wrapped call exposes its arguments to the wrapper.
//!
//! The wrapper needs two things from the arguments of a failed call: the
//! context to hand to the notifier, and a plain-data description for the
//! payload. [`CallArgs`] provides both.
//!
//! Tuples locate the context by capability: the first element that is a `C`
//! (or an `Arc<C>`) is the context. Every other element is described as
//! `argN` with its `Debug` rendering. Argument structs can derive the trait
//! instead and mark the context explicitly with `#[call(context)]`.
//!
//! The lookup goes through [`Any`], so every tuple element must be `'static`.
//! A tuple holding a borrowed context such as `(1, &ctx)` does not implement
//! `CallArgs`; use a derived struct with a `#[call(context)]` reference field
//! for that. With `C = ()` the first `()` element is taken as the context.

use std::{any::Any, fmt, sync::Arc};

use crate::fields::{FieldValue, Fields};

/// Arguments of a wrapped call.
pub trait CallArgs<C: ?Sized> {
    /// The context to forward to the notifier, if the arguments carry one.
    fn context(&self) -> Option<&C>;

    /// Named description of the arguments, excluding the context. The wrapper
    /// sanitizes this before it reaches a notifier.
    fn fields(&self) -> Fields;
}

impl<C: ?Sized> CallArgs<C> for () {
    fn context(&self) -> Option<&C> {
        None
    }

    fn fields(&self) -> Fields {
        Fields::new()
    }
}

impl<C: ?Sized> CallArgs<C> for Fields {
    fn context(&self) -> Option<&C> {
        None
    }

    fn fields(&self) -> Fields {
        self.clone()
    }
}

fn as_context<C: Any>(value: &dyn Any) -> Option<&C> {
    value
        .downcast_ref::<C>()
        .or_else(|| value.downcast_ref::<Arc<C>>().map(|shared| &**shared))
}

macro_rules! impl_call_args_tuple {
    ($($idx:tt $name:ident),+) => {
        impl<Ctx, $($name),+> CallArgs<Ctx> for ($($name,)+)
        where
            Ctx: Any,
            $($name: Any + fmt::Debug,)+
        {
            fn context(&self) -> Option<&Ctx> {
                None $(.or_else(|| as_context::<Ctx>(&self.$idx)))+
            }

            fn fields(&self) -> Fields {
                let mut fields = Fields::new();
                let mut context_seen = false;
                $(
                    if !context_seen && as_context::<Ctx>(&self.$idx).is_some() {
                        context_seen = true;
                    } else {
                        fields.insert(
                            concat!("arg", stringify!($idx)),
                            FieldValue::from_debug(&self.$idx),
                        );
                    }
                )+
                let _ = context_seen;
                fields
            }
        }
    };
}

impl_call_args_tuple!(0 A);
impl_call_args_tuple!(0 A, 1 B);
impl_call_args_tuple!(0 A, 1 B, 2 D);
impl_call_args_tuple!(0 A, 1 B, 2 D, 3 E);
impl_call_args_tuple!(0 A, 1 B, 2 D, 3 E, 4 F);
impl_call_args_tuple!(0 A, 1 B, 2 D, 3 E, 4 F, 5 G);
impl_call_args_tuple!(0 A, 1 B, 2 D, 3 E, 4 F, 5 G, 6 H);
impl_call_args_tuple!(0 A, 1 B, 2 D, 3 E, 4 F, 5 G, 6 H, 7 I);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::CallArgs;
    use crate::{FieldValue, Fields};

    #[derive(Debug, PartialEq)]
    struct RequestContext {
        user_id: &'static str,
    }

    #[test]
    fn tuple_context_is_found_by_type() {
        let args = (1, RequestContext { user_id: "admin" }, 3);
        let context: Option<&RequestContext> = args.context();
        assert_eq!(context.map(|c| c.user_id), Some("admin"));

        let fields = CallArgs::<RequestContext>::fields(&args);
        let keys: Vec<&str> = fields.keys().collect();
        assert_eq!(keys, ["arg0", "arg2"]);
        assert_eq!(fields.get("arg2"), Some(&FieldValue::Str("3".into())));
    }

    #[test]
    fn shared_context_is_found_through_arc() {
        let args = ("instance", Arc::new(RequestContext { user_id: "demo" }));
        let context: Option<&RequestContext> = args.context();
        assert_eq!(context.map(|c| c.user_id), Some("demo"));
    }

    #[test]
    fn tuples_without_context() {
        let args = (1, 2);
        let context: Option<&RequestContext> = args.context();
        assert!(context.is_none());
        assert_eq!(CallArgs::<RequestContext>::fields(&args).len(), 2);
    }

    #[test]
    fn unit_and_fields() {
        assert!(CallArgs::<RequestContext>::context(&()).is_none());
        let fields = crate::fields! { "instance_id" => "i-1" };
        assert_eq!(CallArgs::<RequestContext>::fields(&fields), fields);
        assert!(CallArgs::<RequestContext>::fields(&Fields::new()).is_empty());
    }

    #[test]
    fn unit_context_matches_a_unit_element() {
        let args = (7, (), "vol-1");
        assert!(CallArgs::<()>::context(&args).is_some());
        let fields = CallArgs::<()>::fields(&args);
        let keys: Vec<&str> = fields.keys().collect();
        assert_eq!(keys, ["arg0", "arg2"]);
    }
}
