use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "bg-card text-card-foreground flex flex-col gap-3 rounded-xl border py-4 shadow-sm transition-colors"}
    clx! {CardHeader, div, "flex items-start justify-between gap-3 px-4"}
    clx! {CardTitle, h2, "leading-snug font-semibold break-words"}
    clx! {CardDescription, p, "text-muted-foreground text-sm line-clamp-3"}
    clx! {CardContent, div, "px-4"}
    clx! {CardFooter, footer, "flex items-center justify-between px-4 text-xs text-muted-foreground", "gap-2"}
}

pub use components::*;
