use featurex::features::{
    FeatureData, FeatureValue, FeaturesEntityContext, method_features_extractor,
};
use featurex::syntax::outline::ModuleInfo;
use featurex::syntax::{FileId, Project, SourceParser};
use featurex::views::{EntityView, collect_methods};
use std::sync::Arc;

const SERVICE: &str = r#"
import { Injectable } from '@nestjs/common';
import { hash } from './crypto';

@Injectable()
export class UsersService extends BaseService {
  constructor(repo: UsersRepository) {
    super();
  }

  async findOne(id: string, withPosts?: boolean): Promise<User> {
    await authenticate(id);
    return this.repo.find(id);
  }

  static fromJson(raw: string) {
    return JSON.parse(raw);
  }

  #hashPassword(value: string) {
    return hash(value);
  }
}

export function register(app) {
  app.use(logger());
}
"#;

const CRYPTO: &str = r#"
export function hash(value) {
  return value.split('').reverse().join('');
}
"#;

fn methods() -> Vec<(String, Vec<FeatureValue>)> {
    let mut parser = SourceParser::new().unwrap();
    let mut project = Project::new("users");
    project.add(parser.parse("src/users.service.ts", SERVICE.to_string()).unwrap());
    project.add(parser.parse("src/crypto.ts", CRYPTO.to_string()).unwrap());
    let extractor = method_features_extractor("users", "run-7").unwrap();
    let file = FileId(0);
    let module = Arc::new(ModuleInfo::collect(project.file(file)));
    collect_methods(&project, file)
        .into_iter()
        .map(EntityView::from)
        .map(|view| {
            let context = FeaturesEntityContext::for_entity(&view, "run-7", Arc::clone(&module));
            let values = extractor.features_values(&view, &context).unwrap();
            (view.display_string().to_string(), values)
        })
        .collect()
}

fn feature<'a>(values: &'a [FeatureValue], name: &str) -> &'a FeatureData {
    &values
        .iter()
        .find(|value| value.name == name)
        .unwrap_or_else(|| panic!("missing feature {name}"))
        .value
}

fn method<'a>(
    methods: &'a [(String, Vec<FeatureValue>)],
    display: &str,
) -> &'a [FeatureValue] {
    methods
        .iter()
        .find(|(label, _)| label == display)
        .map(|(_, values)| values.as_slice())
        .unwrap_or_else(|| panic!("no method {display}"))
}

#[test]
fn only_methods_with_parameters_are_collected() {
    let methods = methods();
    let labels: Vec<&str> = methods.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "constructor UsersService.constructor",
            "method UsersService.findOne",
            "method UsersService.fromJson",
            "method UsersService.#hashPassword",
            "function register",
        ]
    );
}

#[test]
fn signature_features() {
    let methods = methods();
    let find_one = method(&methods, "method UsersService.findOne");
    assert_eq!(feature(find_one, "MethodName"), &FeatureData::text("findOne"));
    assert_eq!(feature(find_one, "MethodKind"), &FeatureData::text("method"));
    assert_eq!(
        feature(find_one, "MethodParameterNames"),
        &FeatureData::list(["id", "withPosts"])
    );
    assert_eq!(
        feature(find_one, "MethodParameterTypes"),
        &FeatureData::list(["string", "boolean"])
    );
    assert_eq!(feature(find_one, "MethodNumParameters"), &FeatureData::Number(2));
    assert_eq!(
        feature(find_one, "MethodReturnType"),
        &FeatureData::text("Promise<User>")
    );
    assert_eq!(feature(find_one, "MethodIsAsync"), &FeatureData::Flag(true));
    assert_eq!(feature(find_one, "MethodIsStatic"), &FeatureData::Flag(false));
    assert_eq!(
        feature(find_one, "MethodContainsAuthentication"),
        &FeatureData::Flag(true)
    );
    assert_eq!(feature(find_one, "MethodBodyLength"), &FeatureData::Number(4));
    assert_eq!(feature(find_one, "ClassName"), &FeatureData::text("UsersService"));
    assert_eq!(
        feature(find_one, "ClassDecorators"),
        &FeatureData::list(["Injectable"])
    );
    assert_eq!(feature(find_one, "LineNumber"), &FeatureData::Number(11));
}

#[test]
fn modifiers() {
    let methods = methods();
    let from_json = method(&methods, "method UsersService.fromJson");
    assert_eq!(feature(from_json, "MethodIsStatic"), &FeatureData::Flag(true));
    assert_eq!(feature(from_json, "MethodIsAsync"), &FeatureData::Flag(false));
    let hash_password = method(&methods, "method UsersService.#hashPassword");
    assert_eq!(feature(hash_password, "MethodIsPrivate"), &FeatureData::Flag(true));
    let ctor = method(&methods, "constructor UsersService.constructor");
    assert_eq!(feature(ctor, "MethodKind"), &FeatureData::text("constructor"));
}

#[test]
fn calls_split_into_internal_and_external() {
    let methods = methods();
    let hash_password = method(&methods, "method UsersService.#hashPassword");
    let FeatureData::List(internal) = feature(hash_password, "InternalMethodCalls") else {
        panic!("expected a list");
    };
    assert_eq!(internal.len(), 1);
    assert!(internal[0].starts_with("src/crypto.ts+1+"));
    assert_eq!(
        feature(hash_password, "ExternalMethodCalls"),
        &FeatureData::List(Vec::new())
    );

    let register = method(&methods, "function register");
    assert_eq!(
        feature(register, "ExternalMethodCalls"),
        &FeatureData::list(["app.use", "logger"])
    );
    assert_eq!(feature(register, "ClassName"), &FeatureData::text(""));
    assert_eq!(feature(register, "HasClassName"), &FeatureData::Flag(false));
}

const RESOLVER: &str = r#"
import { Resolver, Query, Mutation, Arg } from 'type-graphql';

@Resolver()
export class RecipeResolver {
  @Query(() => [Recipe], { name: 'recipes' })
  list(@Arg('take') take: number) {
    return [];
  }

  @Mutation(() => Recipe)
  addRecipe(@Arg('title') title: string) {
    return { title };
  }

  describe(recipe: Recipe) {
    return recipe.title;
  }
}
"#;

#[test]
fn resolver_methods_carry_graphql_operations() {
    let mut parser = SourceParser::new().unwrap();
    let mut project = Project::new("recipes");
    project.add(parser.parse("src/recipe.resolver.ts", RESOLVER.to_string()).unwrap());
    let extractor = method_features_extractor("recipes", "run-8").unwrap();
    let module = Arc::new(ModuleInfo::collect(project.file(FileId(0))));
    let operations: Vec<(FeatureData, FeatureData)> = collect_methods(&project, FileId(0))
        .into_iter()
        .map(EntityView::from)
        .map(|view| {
            let context = FeaturesEntityContext::for_entity(&view, "run-8", Arc::clone(&module));
            let values = extractor.features_values(&view, &context).unwrap();
            (
                feature(&values, "GraphQLOperationType").clone(),
                feature(&values, "GraphQLOperationName").clone(),
            )
        })
        .collect();
    assert_eq!(
        operations,
        vec![
            (FeatureData::text("Query"), FeatureData::text("recipes")),
            (FeatureData::text("Mutation"), FeatureData::text("addRecipe")),
            (FeatureData::text(""), FeatureData::text("")),
        ]
    );
}
