#[cfg(test)]
mod tests {
    use crate::tools::extract::*;
    use crate::types::Platform;
    use scraper::{Html, Selector};
    use url::Url;

    const IMAGES: ImageRules = ImageRules {
        root: "https://www.momoshop.com.tw",
        bare_prefix: "https://cdn3.momoshop.com.tw/momoshop/upload/media/",
        host_marker: Some("momoshop"),
    };

    fn with_item<T>(html: &str, f: impl FnOnce(scraper::ElementRef<'_>) -> T) -> T {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("li.item").unwrap();
        let el = doc.select(&sel).next().expect("fixture has li.item");
        f(el)
    }

    #[test]
    fn test_price_takes_largest_run_above_floor() {
        assert_eq!(parse_price("75% OFF NT$1,299"), Some(1299));
        assert_eq!(parse_price("$12,345,678"), Some(12_345_678));
        assert_eq!(parse_price("買2件 9折"), None);
        assert_eq!(parse_price("免運"), None);
    }

    #[test]
    fn test_price_falls_back_to_second_selector() {
        let chain = FieldChain::reading(&[".money .price b", ".price b", ".price"], Read::Text);
        let price = with_item(
            r#"<li class="item"><span class="price"><b>$2,490</b></span></li>"#,
            |el| extract_price(el, &chain),
        );
        assert_eq!(price, Some(2490));
    }

    #[test]
    fn test_clean_text_normalises() {
        assert_eq!(clean_text("  象印&amp;膳魔師\u{200B}\n\t保溫瓶  "), "象印&膳魔師 保溫瓶");
        assert_eq!(clean_text("e\u{0301}"), "\u{00E9}");
    }

    #[test]
    fn test_short_titles_are_skipped() {
        let chain = FieldChain::new(&[
            ("h3.prdName", Read::Text),
            ("a[title]", Read::Attr("title")),
        ]);
        let title = with_item(
            r#"<li class="item"><h3 class="prdName">熱銷</h3>
               <a title="Apple iPhone 15 128G" href="/goods/1"></a></li>"#,
            |el| extract_title(el, &chain),
        );
        assert_eq!(title.as_deref(), Some("Apple iPhone 15 128G"));
    }

    #[test]
    fn test_link_is_resolved_against_origin() {
        let origin = Url::parse("https://www.momoshop.com.tw").unwrap();
        let chain = FieldChain::reading(&["a.goods-img-url", "a[href]"], Read::Attr("href"));
        let link = with_item(
            r#"<li class="item"><a href="javascript:void(0)">x</a>
               <a href="/goods/GoodsDetail.jsp?i_code=123">y</a></li>"#,
            |el| extract_link(el, &chain, &origin),
        );
        assert_eq!(
            link.as_deref(),
            Some("https://www.momoshop.com.tw/goods/GoodsDetail.jsp?i_code=123")
        );
        assert_eq!(
            absolutize(&origin, "//m.momoshop.com.tw/goods/1").as_deref(),
            Some("https://m.momoshop.com.tw/goods/1")
        );
        assert_eq!(absolutize(&origin, ""), None);
    }

    #[test]
    fn test_image_attribute_order_and_placeholders() {
        let chain = FieldChain::new(&[
            ("img.prdImg", Read::FirstAttr(&["src", "data-original", "data-src"])),
            ("img", Read::FirstAttr(&["src", "data-original", "data-src"])),
        ]);
        let image = with_item(
            r#"<li class="item"><img class="prdImg" src="data:image/gif;base64,R0lGOD"
                 data-original="//img1.momoshop.com.tw/goodsimg/1.jpg"></li>"#,
            |el| extract_image(el, &chain, &IMAGES),
        );
        assert_eq!(image.as_deref(), Some("https://img1.momoshop.com.tw/goodsimg/1.jpg"));

        let image = with_item(
            r#"<li class="item"><img src="" data-src="goodsimg/2.jpg"></li>"#,
            |el| extract_image(el, &chain, &IMAGES),
        );
        assert_eq!(
            image.as_deref(),
            Some("https://cdn3.momoshop.com.tw/momoshop/upload/media/goodsimg/2.jpg")
        );
    }

    #[test]
    fn test_image_normalisation_rules() {
        assert_eq!(
            IMAGES.normalize("/ecm/img/1.jpg").as_deref(),
            Some("https://www.momoshop.com.tw/ecm/img/1.jpg")
        );
        assert_eq!(
            IMAGES.normalize("img.momoshop.com.tw/1.jpg").as_deref(),
            Some("https://img.momoshop.com.tw/1.jpg")
        );
        assert_eq!(
            IMAGES.normalize("goodsimg/1.jpg").as_deref(),
            Some("https://cdn3.momoshop.com.tw/momoshop/upload/media/goodsimg/1.jpg")
        );
        assert_eq!(IMAGES.normalize("  "), None);
    }

    #[test]
    fn test_sku_from_url() {
        assert_eq!(
            sku_from_url("https://www.momoshop.com.tw/goods/GoodsDetail.jsp?i_code=10234&str_category_code=1"),
            "10234"
        );
        assert_eq!(sku_from_url("https://www.momoshop.com.tw/goods/TP000123.html?x=1"), "TP000123");
        assert_eq!(sku_from_url("https://shop.test/p/ABC/"), "ABC");
    }

    #[test]
    fn test_admission_gate() {
        let raw = RawCandidate {
            title: Some("保溫瓶 480ml".into()),
            price: Some(990),
            detail_url: Some("https://shop.test/p/1".into()),
            image_url: None,
            sku: "1".into(),
        };
        let candidate = raw.clone().admit().unwrap();
        assert_eq!(candidate.image_url, "");

        let product = candidate.into_product(Platform::Momo, 4);
        assert_eq!(product.sequence_id, 4);
        assert_eq!(product.platform, Platform::Momo);

        let no_price = RawCandidate {
            price: Some(0),
            ..raw.clone()
        };
        assert_eq!(no_price.admit(), Err(ExtractionIncomplete::MissingPrice));

        let no_url = RawCandidate {
            detail_url: Some(String::new()),
            ..raw.clone()
        };
        assert_eq!(no_url.admit(), Err(ExtractionIncomplete::MissingUrl));

        let blank_title = RawCandidate {
            title: Some("   ".into()),
            ..raw
        };
        assert_eq!(blank_title.admit(), Err(ExtractionIncomplete::MissingTitle));
    }
}
