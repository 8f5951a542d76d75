//! Text of every generated file.
//!
//! Renderers write through [`fmt::Write`] so a failing sink surfaces as an
//! error instead of a panic. Output depends only on the arguments, which keeps
//! repeated plans byte-identical.

use std::fmt::{self, Write};

use gm_core::{ChangeKind, Migration, Provider};

use crate::planner::PlanConfig;

/// Framework module pinned in every generated manifest.
pub const GENKIT_MODULE: &str = "github.com/firebase/genkit/go";
/// Version of [`GENKIT_MODULE`].
pub const GENKIT_VERSION: &str = "v1.0.2";
/// AWS plugin module added for the `aws` target.
pub const GENKIT_AWS_MODULE: &str = "github.com/scttfrdmn/genkit-aws";
/// Version of [`GENKIT_AWS_MODULE`].
pub const GENKIT_AWS_VERSION: &str = "v0.1.0";
/// Go toolchain version written to manifests and build files.
pub const GO_VERSION: &str = "1.23";

const AWS_IMPORTS: &[&str] = &[
    "genkitaws \"github.com/scttfrdmn/genkit-aws/pkg/genkit-aws\"",
    "\"github.com/scttfrdmn/genkit-aws/pkg/bedrock\"",
    "\"github.com/scttfrdmn/genkit-aws/pkg/monitoring\"",
];

/// Renders `go.mod`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn go_mod<'a>(
    out: &mut impl Write,
    module: &str,
    target: Provider,
    dependencies: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> fmt::Result {
    writeln!(out, "module {module}")?;
    writeln!(out)?;
    writeln!(out, "go {GO_VERSION}")?;
    writeln!(out)?;
    writeln!(out, "require (")?;
    writeln!(out, "\t{GENKIT_MODULE} {GENKIT_VERSION}")?;
    if target == Provider::Aws {
        writeln!(out, "\t{GENKIT_AWS_MODULE} {GENKIT_AWS_VERSION}")?;
    }
    for (name, version) in dependencies {
        writeln!(out, "\t{name} {version}")?;
    }
    writeln!(out, ")")
}

/// Renders the import skeleton that replaces a framework source file.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn import_skeleton(
    out: &mut impl Write,
    package: &str,
    target: Provider,
    original: &str,
) -> fmt::Result {
    writeln!(out, "package {package}")?;
    writeln!(out)?;
    writeln!(out, "import (")?;
    writeln!(out, "\t\"context\"")?;
    writeln!(out, "\t\"github.com/firebase/genkit/go/genkit\"")?;
    if target == Provider::Aws {
        for import in AWS_IMPORTS {
            writeln!(out, "\t{import}")?;
        }
    }
    writeln!(out, ")")?;
    writeln!(out)?;
    writeln!(
        out,
        "// genkit-migrate: imports rewritten for {target}; port the declarations from {original}."
    )
}

/// Renders `config.yaml` for AWS.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn aws_config(out: &mut impl Write, project_name: &str) -> fmt::Result {
    writeln!(out, "# AWS Configuration for GenKit")?;
    writeln!(out, "aws:")?;
    writeln!(out, "  region: us-east-1")?;
    writeln!(out, "  profile: default")?;
    writeln!(out)?;
    writeln!(out, "  bedrock:")?;
    writeln!(out, "    models:")?;
    writeln!(out, "      - anthropic.claude-3-sonnet-20240229-v1:0")?;
    writeln!(out, "      - amazon.nova-pro-v1:0")?;
    writeln!(out)?;
    writeln!(out, "  cloudwatch:")?;
    writeln!(out, "    namespace: \"GenKit/{project_name}\"")?;
    writeln!(out, "    enabled: true")?;
    writeln!(out)?;
    writeln!(out, "environment:")?;
    writeln!(out, "  GENKIT_ENV: production")?;
    writeln!(out, "  AWS_REGION: us-east-1")
}

/// `terraform/main.tf`: Lambda function, execution role and Bedrock policy.
pub const TERRAFORM_MAIN: &str = r#"terraform {
  required_version = ">= 1.0"
  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = "~> 5.0"
    }
  }
}

provider "aws" {
  region = var.aws_region
}

resource "aws_lambda_function" "genkit_app" {
  filename      = "genkit-app.zip"
  function_name = "genkit-app"
  role          = aws_iam_role.lambda_role.arn
  handler       = "main"
  runtime       = "provided.al2"

  environment {
    variables = {
      GENKIT_ENV = "production"
      AWS_REGION = var.aws_region
    }
  }
}

resource "aws_iam_role" "lambda_role" {
  name = "genkit-lambda-role"

  assume_role_policy = jsonencode({
    Version = "2012-10-17"
    Statement = [
      {
        Action = "sts:AssumeRole"
        Effect = "Allow"
        Principal = {
          Service = "lambda.amazonaws.com"
        }
      }
    ]
  })
}

resource "aws_iam_role_policy" "bedrock_policy" {
  name = "genkit-bedrock-policy"
  role = aws_iam_role.lambda_role.id

  policy = jsonencode({
    Version = "2012-10-17"
    Statement = [
      {
        Effect = "Allow"
        Action = [
          "bedrock:InvokeModel",
          "bedrock:InvokeModelWithResponseStream"
        ]
        Resource = "*"
      }
    ]
  })
}
"#;

/// Renders `terraform/variables.tf`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn terraform_variables(out: &mut impl Write, project_slug: &str) -> fmt::Result {
    writeln!(out, "variable \"aws_region\" {{")?;
    writeln!(out, "  description = \"AWS region\"")?;
    writeln!(out, "  type        = string")?;
    writeln!(out, "  default     = \"us-east-1\"")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "variable \"project_name\" {{")?;
    writeln!(out, "  description = \"Project name\"")?;
    writeln!(out, "  type        = string")?;
    writeln!(out, "  default     = \"{project_slug}\"")?;
    writeln!(out, "}}")
}

/// Renders the two-stage `Dockerfile`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn dockerfile(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "FROM golang:{GO_VERSION}-alpine AS builder")?;
    writeln!(out)?;
    writeln!(out, "WORKDIR /app")?;
    writeln!(out, "COPY go.mod go.sum ./")?;
    writeln!(out, "RUN go mod download")?;
    writeln!(out)?;
    writeln!(out, "COPY . .")?;
    writeln!(out, "RUN CGO_ENABLED=0 GOOS=linux go build -o main .")?;
    writeln!(out)?;
    writeln!(out, "FROM alpine:latest")?;
    writeln!(out, "RUN apk --no-cache add ca-certificates")?;
    writeln!(out, "WORKDIR /root/")?;
    writeln!(out)?;
    writeln!(out, "COPY --from=builder /app/main .")?;
    writeln!(out)?;
    writeln!(out, "EXPOSE 8080")?;
    writeln!(out, "CMD [\"./main\"]")
}

/// Renders `.github/workflows/deploy.yml`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn deploy_workflow(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "name: Deploy to AWS")?;
    writeln!(out)?;
    writeln!(out, "on:")?;
    writeln!(out, "  push:")?;
    writeln!(out, "    branches: [main]")?;
    writeln!(out)?;
    writeln!(out, "jobs:")?;
    writeln!(out, "  test:")?;
    writeln!(out, "    runs-on: ubuntu-latest")?;
    writeln!(out, "    steps:")?;
    writeln!(out, "      - uses: actions/checkout@v4")?;
    writeln!(out, "      - uses: actions/setup-go@v4")?;
    writeln!(out, "        with:")?;
    writeln!(out, "          go-version: '{GO_VERSION}'")?;
    writeln!(out, "      - run: go test -v ./...")?;
    writeln!(out)?;
    writeln!(out, "  deploy:")?;
    writeln!(out, "    needs: test")?;
    writeln!(out, "    runs-on: ubuntu-latest")?;
    writeln!(out, "    steps:")?;
    writeln!(out, "      - uses: actions/checkout@v4")?;
    writeln!(out, "      - uses: aws-actions/configure-aws-credentials@v4")?;
    writeln!(out, "        with:")?;
    writeln!(out, "          aws-access-key-id: ${{{{ secrets.AWS_ACCESS_KEY_ID }}}}")?;
    writeln!(out, "          aws-secret-access-key: ${{{{ secrets.AWS_SECRET_ACCESS_KEY }}}}")?;
    writeln!(out, "          aws-region: us-east-1")?;
    writeln!(out, "      - name: Deploy with Terraform")?;
    writeln!(out, "        run: |")?;
    writeln!(out, "          cd terraform")?;
    writeln!(out, "          terraform init")?;
    writeln!(out, "          terraform plan")?;
    writeln!(out, "          terraform apply -auto-approve")
}

/// Renders `MIGRATION.md` for a planned migration.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn migration_guide(
    out: &mut impl Write,
    migration: &Migration<'_>,
    plan: &PlanConfig,
) -> fmt::Result {
    let project = migration.project();
    let PlanConfig { source, target } = *plan;

    writeln!(out, "# GenKit Migration to {}", target.display_name())?;
    writeln!(out)?;
    writeln!(
        out,
        "This project has been migrated from {} to {} using genkit-migrate.",
        source.display_name(),
        target.display_name()
    )?;
    writeln!(out)?;

    writeln!(out, "## Migration Summary")?;
    writeln!(out)?;
    writeln!(out, "- **Source Provider**: {source}")?;
    writeln!(out, "- **Target Provider**: {target}")?;
    writeln!(out, "- **Flows Found**: {}", project.flows().len())?;
    writeln!(out, "- **Models Found**: {}", project.models().len())?;
    writeln!(out, "- **Changes Applied**: {}", migration.changes().len())?;
    writeln!(out)?;

    writeln!(out, "## Changes Made")?;
    writeln!(out)?;
    for change in migration.changes() {
        writeln!(
            out,
            "- **{}**: {} (in {})",
            change.kind, change.description, change.file
        )?;
    }
    writeln!(out)?;

    if target == Provider::Aws {
        aws_deployment(out)?;
    }

    writeln!(out, "## Model Mappings Applied")?;
    writeln!(out)?;
    let mut any = false;
    for change in migration.changes().iter().filter(|c| c.kind == ChangeKind::Model) {
        if let (Some(old), Some(new)) = (&change.old_value, &change.new_value) {
            writeln!(out, "- `{old}` → `{new}` (in {})", change.file)?;
            any = true;
        }
    }
    if !any {
        writeln!(out, "No model references matched a known mapping.")?;
    }
    writeln!(out)?;

    if !migration.commands.is_empty() {
        writeln!(out, "## Commands to Run")?;
        writeln!(out)?;
        writeln!(out, "```bash")?;
        for command in &migration.commands {
            writeln!(out, "{command}")?;
        }
        writeln!(out, "```")?;
        writeln!(out)?;
    }

    writeln!(out, "## Support")?;
    writeln!(out)?;
    writeln!(out, "- [GenKit Documentation](https://firebase.google.com/docs/genkit)")?;
    writeln!(out, "- [genkit-aws](https://github.com/scttfrdmn/genkit-aws)")?;
    writeln!(out, "- [Amazon Bedrock](https://docs.aws.amazon.com/bedrock/)")
}

fn aws_deployment(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "## AWS Deployment")?;
    writeln!(out)?;
    writeln!(out, "### Prerequisites")?;
    writeln!(out)?;
    writeln!(out, "1. AWS CLI configured with appropriate credentials")?;
    writeln!(out, "2. Terraform installed (>= 1.0)")?;
    writeln!(out, "3. Docker installed (for container builds)")?;
    writeln!(out, "4. Access to Amazon Bedrock models in your region")?;
    writeln!(out)?;
    writeln!(out, "### Deploy with Terraform")?;
    writeln!(out)?;
    writeln!(out, "```bash")?;
    writeln!(out, "cd terraform")?;
    writeln!(out, "terraform init")?;
    writeln!(out, "terraform plan")?;
    writeln!(out, "terraform apply")?;
    writeln!(out, "```")?;
    writeln!(out)?;
    writeln!(out, "### Build and Deploy Docker Container")?;
    writeln!(out)?;
    writeln!(out, "```bash")?;
    writeln!(out, "docker build -t genkit-app .")?;
    writeln!(out, "docker run -p 8080:8080 genkit-app")?;
    writeln!(out, "```")?;
    writeln!(out)?;
    writeln!(out, "### Configuration")?;
    writeln!(out)?;
    writeln!(
        out,
        "Edit `config.yaml` to set the AWS region, Bedrock models and CloudWatch namespace."
    )?;
    writeln!(out)?;
    writeln!(out, "## Next Steps")?;
    writeln!(out)?;
    writeln!(out, "1. Review the generated import blocks and port each flow body")?;
    writeln!(out, "2. Replace model references using the mappings below")?;
    writeln!(out, "3. Run `go mod tidy` to refresh `go.sum`")?;
    writeln!(out, "4. Run the test suite: `go test ./...`")?;
    writeln!(out, "5. Enable the Bedrock models in the AWS console")?;
    writeln!(out, "6. Deploy with Terraform and verify CloudWatch metrics")?;
    writeln!(out)
}
