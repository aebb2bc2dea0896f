macro_rules! sensitive_debug {
    ($ident:ident $(< $($generic:ident),* >)?) => {
        impl $(< $($generic),* >)? ::core::fmt::Debug for $ident $(< $($generic),* >)? {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str("[redacted]")
            }
        }
    };
}

pub(crate) use sensitive_debug;
