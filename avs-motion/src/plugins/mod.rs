//! Things related to making filter plugins.

use anyhow::Error;

use crate::core::Core;
use crate::frame::FrameRef;
use crate::map::{self, Map};
use crate::node::Node;
use crate::video_info::VideoInfo;

/// Plugin metadata.
#[derive(Debug, Clone, Copy)]
pub struct Metadata {
    /// A "reverse" URL, unique among all plugins.
    ///
    /// For example, `com.example.invert`.
    pub identifier: &'static str,

    /// Namespace where the plugin's filters will go, unique among all plugins.
    ///
    /// For example, `invert`.
    pub namespace: &'static str,

    /// Plugin name in readable form.
    pub name: &'static str,
}

/// A filter interface.
pub trait Filter: Send + Sync {
    /// Returns the parameters of this filter's output node.
    fn video_info(&self) -> VideoInfo;

    /// Produces frame `n`.
    ///
    /// `core` is the host core the filter was created on; it can be used to build intermediate
    /// clips.
    fn get_frame(&self, core: &dyn Core, n: usize) -> Result<FrameRef, Error>;
}

/// A filter function interface.
///
/// See the `make_filter_function!` macro that generates types implementing this automatically.
pub trait FilterFunction: Send + Sync {
    /// Returns the name of the function.
    ///
    /// The characters allowed are letters, numbers and the underscore.
    fn name(&self) -> &str;

    /// Returns the argument string.
    ///
    /// Each argument is a type character (`c` clip, `i` int, `s` string, `b` bool).
    /// Optional arguments are prefixed with their name in brackets, as in `c[file]s[offset]i`.
    fn args(&self) -> &str;

    /// The callback for this filter function.
    ///
    /// Returning `Ok(None)` means no clip is produced.
    fn create(&self, core: &dyn Core, args: &Map) -> Result<Option<Box<dyn Filter>>, Error>;
}

/// An interface for filter function arguments.
pub trait FilterArgument: Sized {
    /// Returns the argument type character.
    fn type_char() -> char;

    /// Returns whether the argument may be omitted.
    #[inline]
    fn is_optional() -> bool {
        false
    }

    /// Retrieves the argument from the map.
    fn from_map(map: &Map, key: &str) -> Result<Self, map::Error>;
}

impl FilterArgument for i64 {
    #[inline]
    fn type_char() -> char {
        'i'
    }

    #[inline]
    fn from_map(map: &Map, key: &str) -> Result<Self, map::Error> {
        map.get_int(key)
    }
}

impl FilterArgument for bool {
    #[inline]
    fn type_char() -> char {
        'b'
    }

    #[inline]
    fn from_map(map: &Map, key: &str) -> Result<Self, map::Error> {
        map.get_int(key).map(|x| x != 0)
    }
}

impl FilterArgument for String {
    #[inline]
    fn type_char() -> char {
        's'
    }

    #[inline]
    fn from_map(map: &Map, key: &str) -> Result<Self, map::Error> {
        let data = map.get_data(key)?;
        String::from_utf8(data.to_vec()).map_err(|_| map::Error::WrongValueType)
    }
}

impl FilterArgument for Node {
    #[inline]
    fn type_char() -> char {
        'c'
    }

    #[inline]
    fn from_map(map: &Map, key: &str) -> Result<Self, map::Error> {
        map.get_node(key)
    }
}

impl<T: FilterArgument> FilterArgument for Option<T> {
    #[inline]
    fn type_char() -> char {
        T::type_char()
    }

    #[inline]
    fn is_optional() -> bool {
        true
    }

    #[inline]
    fn from_map(map: &Map, key: &str) -> Result<Self, map::Error> {
        match T::from_map(map, key) {
            Ok(x) => Ok(Some(x)),
            Err(map::Error::KeyNotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Appends one argument to an argument string.
#[doc(hidden)]
pub fn push_argument<T: FilterArgument>(args: &mut String, name: &str) {
    if T::is_optional() {
        args.push('[');
        args.push_str(name);
        args.push(']');
    }
    args.push(T::type_char());
}

/// Wraps an argument retrieval error.
#[doc(hidden)]
pub fn argument_error(name: &'static str, source: map::Error) -> Error {
    crate::error::Error::Argument { name, source }.into()
}

/// Make a filter function easily and avoid boilerplate.
///
/// This macro accepts the name of the filter function type, the name of the filter and the create
/// function.
///
/// The macro generates a type implementing `FilterFunction` with the correct `args()` string
/// derived from the function parameters of the specified create function. The generated
/// `FilterFunction::create()` extracts all parameters from the argument map received from the
/// host and passes them into the specified create function.
///
/// The create function should look like:
///
/// ```ignore
/// fn create(
///     core: &dyn Core,
///     /* filter arguments */
/// ) -> Result<Option<Box<dyn Filter>>, Error> {
///     /* ... */
/// }
/// ```
///
/// All filter arguments must implement `FilterArgument`. Wrap an argument type in `Option` to
/// make it optional.
#[macro_export]
macro_rules! make_filter_function {
    (
        $struct_name:ident, $function_name:tt

        $(#[$attr:meta])*
        fn $create_fn_name:ident(
            $core_arg_name:ident : $core_arg_type:ty
            $(, $arg_name:ident : $arg_type:ty)* $(,)*
        ) -> $return_type:ty $body:block
    ) => (
        struct $struct_name {
            args: String,
        }

        impl $struct_name {
            fn new() -> Self {
                let mut args = String::new();
                $(
                    $crate::plugins::push_argument::<$arg_type>(
                        &mut args,
                        stringify!($arg_name),
                    );
                )*
                Self { args }
            }
        }

        impl $crate::plugins::FilterFunction for $struct_name {
            #[inline]
            fn name(&self) -> &str {
                $function_name
            }

            #[inline]
            fn args(&self) -> &str {
                &self.args
            }

            fn create(
                &self,
                core: &dyn $crate::core::Core,
                args: &$crate::map::Map,
            ) -> ::std::result::Result<
                ::std::option::Option<::std::boxed::Box<dyn $crate::plugins::Filter>>,
                $crate::anyhow::Error,
            > {
                $(
                    let $arg_name = <$arg_type as $crate::plugins::FilterArgument>::from_map(
                        args,
                        stringify!($arg_name),
                    )
                    .map_err(|err| $crate::plugins::argument_error(stringify!($arg_name), err))?;
                )*

                $create_fn_name(core, $($arg_name),*)
            }
        }

        $(#[$attr])*
        fn $create_fn_name(
            $core_arg_name: $core_arg_type
            $(, $arg_name: $arg_type)*
        ) -> $return_type $body
    )
}
