//! Bodies of files created from scratch: page fallback, type file and model file

use crate::naming::capitalize_first;

/// Page template used when the project ships no `template/page.tpl`
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<template>
  <div class="<%= name %>-page">
    <h2><%= fileName %></h2>
  </div>
</template>

<script lang="ts">
import { defineComponent } from 'vue';

export default defineComponent({
  name: '<%= fileName %>',
});
</script>

<style scoped>
.<%= name %>-page {
  padding: 16px;
}
</style>
"#;

/// State interface exported from `type/<name>/index.ts`
pub fn type_file(name: &str) -> String {
    let type_name = capitalize_first(name);
    format!(
        r#"/**
 * State of the {name} page
 * @param tableLoad table loading flag
 * @param queryInfo request parameters
 * @param resData response data
 */
export interface {type_name}State {{
  tableLoad?: boolean | undefined;
  queryInfo?: any;
  resData?: any;
  [name: string]: any;
}}
"#
    )
}

/// Model module written to `models/<name>Store.ts`
pub fn model_file(name: &str) -> String {
    let type_name = capitalize_first(name);
    format!(
        r#"import {{ Reducer, Effect }} from 'umi';
import {{ ConnectState }} from './connect';
import {{ {type_name}State }} from '../type';

export interface {type_name}Type {{
  namespace: '{name}Store';
  state: {type_name}State;
  effects: {{}};
  reducers: {{}};
}}

const {type_name}: {type_name}Type = {{
  namespace: '{name}Store',

  state: {{}},

  effects: {{}},

  reducers: {{}},
}};

export default {type_name};
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutate::tree::{validate, Dialect};
    use crate::templates::render::render;

    #[test]
    fn test_type_file_declares_capitalized_state() {
        let body = type_file("orderList");
        assert!(body.contains("export interface OrderListState {"));
        assert!(validate(&body, Dialect::TypeScript).is_ok());
    }

    #[test]
    fn test_model_file_is_valid_typescript() {
        let body = model_file("orderList");
        assert!(body.contains("namespace: 'orderListStore',"));
        assert!(body.contains("import { OrderListState } from '../type';"));
        assert!(body.contains("export default OrderList;"));
        assert!(validate(&body, Dialect::TypeScript).is_ok());
    }

    #[test]
    fn test_default_page_template_renders() {
        let page = render(
            DEFAULT_PAGE_TEMPLATE,
            &[("name", "orderList"), ("fileName", "OrderList")],
        )
        .unwrap();
        assert!(page.contains("<h2>OrderList</h2>"));
        assert!(page.contains(".orderList-page {"));
    }
}
