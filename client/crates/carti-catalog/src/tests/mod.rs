
use crate::DynamicTabData;

use serde_json::json;

pub(crate) fn sample_tab_data() -> DynamicTabData {
    serde_json::from_value(json!({
        "brandId": "tab_burgers_001",
        "brandName": "Burger Barn",
        "metadata": { "backgroundColor": "#FFC72C", "accentColor": "#DA291C" },
        "banners": [
            { "id": "b2", "imageUrl": "https://img/2.png", "title": "Deal", "subtitle": "", "order": 2, "isActive": true },
            { "id": "b1", "imageUrl": "https://img/1.png", "title": "New", "subtitle": "", "order": 1, "isActive": true },
            { "id": "b0", "imageUrl": "https://img/0.png", "title": "Old", "subtitle": "", "order": 0, "isActive": false }
        ],
        "categories": [
            { "id": "c2", "name": "Drinks", "imageUrl": "", "productCount": 1, "order": 2 },
            { "id": "c1", "name": "Burgers", "imageUrl": "", "productCount": 2, "order": 1 }
        ],
        "products": [
            { "id": "p1", "name": "Classic", "price": 5.5, "category": "Burgers", "inStock": true },
            { "id": "p2", "name": "Cola", "price": 1.99, "originalPrice": 2.49, "discount": 20, "category": "Drinks", "inStock": true },
            { "id": "p3", "name": "Double", "price": 7.25, "category": "Burgers", "inStock": false }
        ],
        "featured": {
            "newArrivals": ["p3", "missing", "p1"],
            "deals": ["p2"]
        }
    }))
    .unwrap()
}
