//! Macros utilitarias para reducir boilerplate al definir modelos de IO y
//! pasos tipados.
//!
//! Exportadas en la raíz del crate para poder usarlas como:
//!   use chain_core::{executable, io_model};

/// Declara un struct de IO con derives serde e `IoModel`. Todos los campos
/// son requeridos por el contrato.
///
/// ```ignore
/// io_model!(Counter { f: i64 });
/// ```
#[macro_export]
macro_rules! io_model {
    ($name:ident { $($fname:ident : $fty:ty),* $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name { $(pub $fname: $fty,)* }
        impl $crate::model::IoModel for $name {
            const FIELDS: &'static [&'static str] = &[$(stringify!($fname)),*];
        }
    };
}

/// Declara un paso `Executable` infalible.
///
/// Formas soportadas:
/// - unit: `executable!(Name { name: "n", input: In, output: Out, invoke(self, input, ctx) { ... } })`
/// - con fields: igual, agregando `fields { a: Ty }` antes de `invoke`; genera `Name::new(a)`.
///
/// El bloque de `invoke` evalúa al `Output`. Para pasos que pueden fallar,
/// implementar `Executable` a mano.
#[macro_export]
macro_rules! executable {
    (@impl $name:ident, $sname:expr, $inp:ty, $out:ty, $slf:ident, $inp_ident:ident, $ctx_ident:ident, $body:block) => {
        impl $crate::step::Executable for $name {
            type Config = ();
            type Input = $inp;
            type Output = $out;
            fn name(&self) -> &str { $sname }
            fn invoke(&$slf,
                      $inp_ident: Self::Input,
                      $ctx_ident: &mut $crate::engine::ExecutionContext<'_>)
                      -> ::std::result::Result<Self::Output, $crate::errors::CoreEngineError> {
                let out: Self::Output = $body;
                Ok(out)
            }
        }
    };

    // ---------------- con fields ----------------
    (
        $name:ident {
            name: $sname:expr,
            input: $inp:ty,
            output: $out:ty,
            fields { $($fname:ident : $fty:ty),+ $(,)? },
            invoke($slf:ident, $inp_ident:ident, $ctx_ident:ident) $body:block $(,)?
        }
    ) => {
        #[derive(Clone, Debug)]
        pub struct $name { $(pub $fname: $fty),+ }
        impl $name { pub fn new($($fname : $fty),+) -> Self { Self { $($fname),+ } } }
        $crate::executable!(@impl $name, $sname, $inp, $out, $slf, $inp_ident, $ctx_ident, $body);
    };

    // ---------------- unit (sin fields) ----------------
    (
        $name:ident {
            name: $sname:expr,
            input: $inp:ty,
            output: $out:ty,
            invoke($slf:ident, $inp_ident:ident, $ctx_ident:ident) $body:block $(,)?
        }
    ) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;
        $crate::executable!(@impl $name, $sname, $inp, $out, $slf, $inp_ident, $ctx_ident, $body);
    };
}
