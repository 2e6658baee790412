//! The route table and handler registry for the publishing API.
//!
//! Operation ids are the contract between the two: [`router`] maps
//! method + path to an id, [`registry`] maps the id to its handler. The
//! server glue holds both.

use quill_router::{MethodMap, Router};

use crate::handlers::{books, chapters, stories, tags};
use crate::registry::HandlerRegistry;

/// Builds the route table.
#[must_use]
pub fn router() -> Router {
    let mut router = Router::new();

    router.insert(
        "/stories",
        MethodMap::new().get("list_stories").post("create_story"),
    );
    router.insert("/stories/mine", MethodMap::new().get("list_my_stories"));
    router.insert(
        "/stories/{story_id}",
        MethodMap::new()
            .get("get_story")
            .put("update_story")
            .delete("delete_story"),
    );
    router.insert(
        "/stories/{story_id}/publish",
        MethodMap::new().post("publish_story"),
    );
    router.insert(
        "/stories/{story_id}/unpublish",
        MethodMap::new().post("unpublish_story"),
    );
    router.insert(
        "/stories/{story_id}/convert",
        MethodMap::new().post("convert_story"),
    );

    router.insert(
        "/stories/{story_id}/chapters",
        MethodMap::new().get("list_chapters").post("create_chapter"),
    );
    router.insert(
        "/stories/{story_id}/chapters/{chapter_id}",
        MethodMap::new()
            .get("get_chapter")
            .put("update_chapter")
            .delete("delete_chapter"),
    );

    router.insert(
        "/stories/{story_id}/books",
        MethodMap::new().get("list_books").post("create_book"),
    );
    router.insert(
        "/stories/{story_id}/books/{book_id}",
        MethodMap::new()
            .get("get_book")
            .put("update_book")
            .delete("delete_book"),
    );
    router.insert(
        "/stories/{story_id}/books/{book_id}/chapters",
        MethodMap::new()
            .get("list_book_chapters")
            .post("create_book_chapter"),
    );

    router.insert("/tags", MethodMap::new().get("list_tags"));
    router.insert("/stories/{story_id}/tags", MethodMap::new().post("attach_tag"));
    router.insert(
        "/stories/{story_id}/tags/{tag_name}",
        MethodMap::new().delete("detach_tag"),
    );

    router
}

/// Builds the handler registry covering every route in [`router`].
#[must_use]
pub fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register("list_stories", stories::list_stories);
    registry.register("create_story", stories::create_story);
    registry.register("list_my_stories", stories::list_my_stories);
    registry.register("get_story", stories::get_story);
    registry.register("update_story", stories::update_story);
    registry.register("delete_story", stories::delete_story);
    registry.register("publish_story", stories::publish_story);
    registry.register("unpublish_story", stories::unpublish_story);
    registry.register("convert_story", stories::convert_story);

    registry.register("list_chapters", chapters::list_chapters);
    registry.register("create_chapter", chapters::create_chapter);
    registry.register("get_chapter", chapters::get_chapter);
    registry.register("update_chapter", chapters::update_chapter);
    registry.register("delete_chapter", chapters::delete_chapter);
    registry.register("list_book_chapters", chapters::list_book_chapters);
    registry.register("create_book_chapter", chapters::create_book_chapter);

    registry.register("list_books", books::list_books);
    registry.register("create_book", books::create_book);
    registry.register("get_book", books::get_book);
    registry.register("update_book", books::update_book);
    registry.register("delete_book", books::delete_book);

    registry.register("list_tags", tags::list_tags);
    registry.register("attach_tag", tags::attach_tag);
    registry.register("detach_tag", tags::detach_tag);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_every_routed_operation_has_a_handler() {
        let router = router();
        let registry = registry();

        let paths = [
            (Method::GET, "/stories"),
            (Method::POST, "/stories"),
            (Method::GET, "/stories/mine"),
            (Method::GET, "/stories/s-1"),
            (Method::PUT, "/stories/s-1"),
            (Method::DELETE, "/stories/s-1"),
            (Method::POST, "/stories/s-1/publish"),
            (Method::POST, "/stories/s-1/unpublish"),
            (Method::POST, "/stories/s-1/convert"),
            (Method::GET, "/stories/s-1/chapters"),
            (Method::POST, "/stories/s-1/chapters"),
            (Method::GET, "/stories/s-1/chapters/c-1"),
            (Method::PUT, "/stories/s-1/chapters/c-1"),
            (Method::DELETE, "/stories/s-1/chapters/c-1"),
            (Method::GET, "/stories/s-1/books"),
            (Method::POST, "/stories/s-1/books"),
            (Method::GET, "/stories/s-1/books/b-1"),
            (Method::PUT, "/stories/s-1/books/b-1"),
            (Method::DELETE, "/stories/s-1/books/b-1"),
            (Method::GET, "/stories/s-1/books/b-1/chapters"),
            (Method::POST, "/stories/s-1/books/b-1/chapters"),
            (Method::GET, "/tags"),
            (Method::POST, "/stories/s-1/tags"),
            (Method::DELETE, "/stories/s-1/tags/romance"),
        ];

        for (method, path) in paths {
            let matched = router
                .match_route(&method, path)
                .unwrap_or_else(|| panic!("no route for {method} {path}"));
            assert!(
                registry.get(matched.operation_id).is_some(),
                "no handler for {}",
                matched.operation_id
            );
        }
        assert_eq!(registry.len(), 24);
    }

    #[test]
    fn test_mine_wins_over_story_id() {
        let router = router();
        let m = router.match_route(&Method::GET, "/stories/mine").unwrap();
        assert_eq!(m.operation_id, "list_my_stories");
        assert!(m.params.is_empty());

        let m = router.match_route(&Method::GET, "/stories/abc").unwrap();
        assert_eq!(m.operation_id, "get_story");
        assert_eq!(m.params.get("story_id"), Some("abc"));
    }

    #[test]
    fn test_unknown_method_reports_allowed() {
        let router = router();
        assert!(router.match_route(&Method::PATCH, "/stories").is_none());
        let (methods, _) = router.match_path("/stories").unwrap();
        let mut allowed: Vec<String> = methods
            .allowed_methods()
            .iter()
            .map(ToString::to_string)
            .collect();
        allowed.sort();
        assert_eq!(allowed, vec!["GET", "POST"]);
    }
}
