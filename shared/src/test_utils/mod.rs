pub mod dynamo_test_utils;
pub mod http_test_utils;
pub mod mock_campaign_store;
pub mod mock_form_submitter;
pub mod mock_signup_store;
pub mod test_logging;
