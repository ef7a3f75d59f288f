use maud::{Markup, html};

use super::{Menu, MenuItem, MenuNode, ROOT_PATH, TopMenu};

impl TopMenu {
    /// Nested `<ul>` navigation for the whole tree.
    ///
    /// Breadcrumb-only items are skipped. Unimplemented items render as a
    /// disabled span, action items as a confirmable post link.
    pub fn render_nav(&self) -> Markup {
        html! {
            nav.menu {
                (self.render_children(ROOT_PATH))
            }
        }
    }

    fn render_children(&self, path: &str) -> Markup {
        let children = self.children(path);
        html! {
            @if !children.is_empty() {
                ul {
                    @for node in children {
                        @match node {
                            MenuNode::Menu(menu) => {
                                li class=(submenu_class(menu)) {
                                    span.menu-title { (menu.title) }
                                    (self.render_children(&menu.path))
                                }
                            }
                            MenuNode::Item(item) => {
                                @if !item.breadcrumb {
                                    li class=(item_class(item)) { (render_item(item)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn submenu_class(menu: &Menu) -> String {
    let mut class = format!("submenu depth-{}", menu.depth);
    for extra in &menu.css_classes {
        class.push(' ');
        class.push_str(extra);
    }
    class
}

fn item_class(item: &MenuItem) -> String {
    let mut classes = vec!["item"];
    if item.tbd {
        classes.push("tbd");
    }
    classes.extend(item.css_classes.iter().map(String::as_str));
    classes.join(" ")
}

fn render_item(item: &MenuItem) -> Markup {
    if item.tbd {
        return html! { span.disabled title="Not yet implemented" { (item.title) } };
    }
    if item.method.is_action() {
        return html! {
            a href="#" class="post-action"
                data-href=(item.route)
                data-method=(item.method.as_str())
                data-confirm=[(!item.confirm_message.is_empty()).then_some(&item.confirm_message)]
                { (item.title) " ⚙" }
        };
    }
    let target = item.external.then_some("_blank");
    html! {
        a href=(item.route) title=(item.description) target=[target] { (item.title) }
    }
}

#[cfg(test)]
mod tests {
    use crate::menu::{Method, RegisterPath, TopMenu};

    #[test]
    fn test_nav_renders_tree() {
        let mut menu = TopMenu::default();
        menu.register_path(RegisterPath::item("/ops/coll", "/ops/coll", "Collections"))
            .unwrap();
        menu.register_path(RegisterPath::item("/ops/todo", "/ops/todo", "Later").tbd())
            .unwrap();
        menu.register_path(
            RegisterPath::item("/ops/restart", "/ops/restart", "Restart")
                .method(Method::Post, "Really?"),
        )
        .unwrap();
        menu.register_path(RegisterPath::item("/docs/wiki", "https://wiki.example", "Wiki").external())
            .unwrap();
        let mut hidden = RegisterPath::item("/ops/hidden", "/ops/hidden", "Hidden");
        hidden.breadcrumb = true;
        menu.register_path(hidden).unwrap();

        let html = menu.render_nav().into_string();
        assert!(html.contains(r#"<li class="submenu depth-1">"#));
        assert!(html.contains(r#"<span class="menu-title">Ops</span>"#));
        assert!(html.contains(r#"<a href="/ops/coll" title="">Collections</a>"#));
        assert!(html.contains(r#"<span class="disabled" title="Not yet implemented">Later</span>"#));
        assert!(html.contains(r#"data-method="post" data-confirm="Really?""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(!html.contains("Hidden"));
    }
}
