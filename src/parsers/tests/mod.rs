mod css_rule_tests;
mod html_parser_tests;
