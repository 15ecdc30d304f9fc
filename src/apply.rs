/// Calls a function with a tuple spread into positional arguments.
///
/// Implemented for every `Fn` taking up to eight arguments, so a suite's
/// function under test keeps its real signature and a case supplies its
/// inputs as the matching tuple: `|a: i32, b: i32| a + b` takes `(1, 2)`.
pub trait Apply<Args> {
    type Output;

    fn apply(&self, args: Args) -> Self::Output;
}

impl<F, R> Apply<()> for F
where
    F: Fn() -> R,
{
    type Output = R;

    fn apply(&self, _args: ()) -> R {
        self()
    }
}

macro_rules! impl_apply {
    ($($name:ident),+) => {
        impl<F, R, $($name),+> Apply<($($name,)+)> for F
        where
            F: Fn($($name),+) -> R,
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn apply(&self, ($($name,)+): ($($name,)+)) -> R {
                self($($name),+)
            }
        }
    };
}

impl_apply!(A);
impl_apply!(A, B);
impl_apply!(A, B, C);
impl_apply!(A, B, C, D);
impl_apply!(A, B, C, D, E);
impl_apply!(A, B, C, D, E, G);
impl_apply!(A, B, C, D, E, G, H);
impl_apply!(A, B, C, D, E, G, H, I);
