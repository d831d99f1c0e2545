#[cfg(test)]
mod tests {
    use crate::tools::locate::*;
    use crate::tools::session::fake::FakeBrowser;
    use crate::tools::session::Browser;
    use scraper::Html;
    use std::time::Duration;

    const URL: &str = "https://shop.test/search";

    fn chain() -> SelectorChain {
        SelectorChain::new(&["li.listAreaLi", "li.goodsItemLi", ".searchPrdList li"])
    }

    #[test]
    fn test_first_matching_selector_wins() {
        let doc = Html::parse_document(
            r#"<ul class="searchPrdList">
                <li class="goodsItemLi">a</li>
                <li class="goodsItemLi">b</li>
                <li>c</li>
            </ul>"#,
        );
        let found = locate(&doc, &chain()).unwrap();
        assert_eq!(found.selector, "li.goodsItemLi");
        assert_eq!(found.elements.len(), 2);
    }

    #[test]
    fn test_falls_through_to_last_selector() {
        let doc = Html::parse_document(r#"<ul class="searchPrdList"><li>x</li></ul>"#);
        let found = locate(&doc, &chain()).unwrap();
        assert_eq!(found.selector, ".searchPrdList li");
    }

    #[test]
    fn test_no_match_is_none() {
        let doc = Html::parse_document("<div>nothing here</div>");
        assert!(locate(&doc, &chain()).is_none());
        assert_eq!(matching_selector("<p></p>", &chain()), None);
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let chain = SelectorChain::new(&["li[", "li.ok"]);
        assert_eq!(chain.iter().count(), 1);
        assert_eq!(matching_selector(r#"<ul><li class="ok"></li></ul>"#, &chain), Some("li.ok"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_matching_source() {
        let mut browser =
            FakeBrowser::new().with_page(URL, r#"<ul><li class="listAreaLi">x</li></ul>"#);
        browser.goto(URL).await.unwrap();

        let html = wait_for_listings(
            &mut browser,
            &chain(),
            Duration::from_secs(15),
            Duration::from_millis(500),
        )
        .await
        .unwrap();
        assert!(html.unwrap().contains("listAreaLi"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_gives_up_after_deadline() {
        let mut browser = FakeBrowser::new().with_page(URL, "<div>empty</div>");
        browser.goto(URL).await.unwrap();

        let start = tokio::time::Instant::now();
        let html = wait_for_listings(
            &mut browser,
            &chain(),
            Duration::from_secs(15),
            Duration::from_millis(500),
        )
        .await
        .unwrap();
        assert!(html.is_none());
        assert!(start.elapsed() >= Duration::from_secs(15));
    }
}
