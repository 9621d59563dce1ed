//! Composable parameters for `hab svc load`.
//!
//! A [`LoadOption`] receives the argument list built so far and returns it,
//! possibly extended. Options are applied in the order they are passed, after
//! the base `svc load` arguments.

/// A pure transformation of the `svc load` argument list.
pub type LoadOption = Box<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// Appends one `--bind <spec>` pair per bind, preserving order.
///
/// An empty list leaves the arguments untouched.
///
/// ```
/// use habcmd::hab::binds;
///
/// let option = binds(["cache:redis.default", "db:postgresql.default"]);
/// let args = option(vec!["svc".to_owned()]);
/// assert_eq!(
///     args,
///     ["svc", "--bind", "cache:redis.default", "--bind", "db:postgresql.default"]
/// );
/// ```
#[must_use]
pub fn binds<I, S>(specs: I) -> LoadOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let owned: Vec<String> = specs.into_iter().map(Into::into).collect();
    Box::new(move |mut args| {
        for bind in &owned {
            args.push(String::from("--bind"));
            args.push(bind.clone());
        }
        args
    })
}

/// Appends `--binding-mode <mode>` when the mode is non-empty.
#[must_use]
pub fn binding_mode(value: impl Into<String>) -> LoadOption {
    let mode: String = value.into();
    Box::new(move |mut args| {
        if !mode.is_empty() {
            args.push(String::from("--binding-mode"));
            args.push(mode.clone());
        }
        args
    })
}

/// Folds `options` over `args` from left to right.
pub(crate) fn apply(args: Vec<String>, options: &[LoadOption]) -> Vec<String> {
    options
        .iter()
        .fold(args, |built, option| option(built))
}
