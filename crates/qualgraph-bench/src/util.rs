use qualgraph_core::{CategoryId, CategoryRecord, CodeId, CodeRecord};

/// A balanced category tree `depth` levels deep with `fanout` subcategories
/// per category and `codes_per_category` codes hanging off each category.
pub fn generate_synthetic_hierarchy(
    depth: usize,
    fanout: usize,
    codes_per_category: usize,
) -> (Vec<CategoryRecord>, Vec<CodeRecord>) {
    let mut categories = vec![CategoryRecord {
        id: CategoryId(1),
        name: "Category_1".to_string(),
        ..Default::default()
    }];
    let mut level = vec![CategoryId(1)];
    let mut next_id = 2;

    for _ in 1..depth {
        let mut next_level = Vec::with_capacity(level.len() * fanout);
        for parent in &level {
            for _ in 0..fanout {
                let id = CategoryId(next_id);
                next_id += 1;
                categories.push(CategoryRecord {
                    id,
                    name: format!("Category_{}", id.0),
                    parent: Some(*parent),
                    ..Default::default()
                });
                next_level.push(id);
            }
        }
        level = next_level;
    }

    let mut codes = Vec::with_capacity(categories.len() * codes_per_category);
    for category in &categories {
        for _ in 0..codes_per_category {
            let id = CodeId(codes.len() as i64 + 1);
            codes.push(CodeRecord {
                id,
                name: format!("Code_{}", id.0),
                category: Some(category.id),
                color: Some(format!("#{:06X}", (id.0 * 0x2F4F4F) & 0xFFFFFF)),
                ..Default::default()
            });
        }
    }

    (categories, codes)
}
