mod service_test;

use httpmock::prelude::*;
use rk_testutils::*;
use rstest::*;
use tracing_test::traced_test;

use super::*;
use crate::prelude::*;
